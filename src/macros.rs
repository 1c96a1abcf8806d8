//! Macros for declaring state enums.

/// Declare a fieldless enum usable as a state set key.
///
/// Derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and the serde
/// traits, and implements [`State`](crate::core::State) with each variant's
/// identifier as its name. The calling crate needs `serde` as a dependency.
///
/// # Example
///
/// ```
/// use state_gate::state_enum;
/// use state_gate::core::State;
///
/// state_enum! {
///     pub enum JobState {
///         Queued,
///         Running,
///         Done,
///     }
/// }
///
/// assert_eq!(JobState::Running.name(), "Running");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
