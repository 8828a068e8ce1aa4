//! Declaration of explanation and skill keys.

/// Declares the keys of a category as constants named after the key, so that
/// `keys!("General"; EliminateOneInProduct)` declares `EliminateOneInProduct` with the value
/// `"General.EliminateOneInProduct"`.
macro_rules! keys {
    ($category:literal; $($(#[$attr:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            #[allow(non_upper_case_globals)]
            pub const $name: ::solver_engine::metadata::MetadataKey =
                ::solver_engine::metadata::MetadataKey::new(concat!($category, ".", stringify!($name)));
        )*
    };
}

pub(crate) use keys;

/// Skills exercised by the steps of several categories.
pub mod skill {
    super::keys!("Skill";
        /// Finding the least common multiple of two integers.
        NumericLcm,
    );
}
