//! Helper macro for generating domain port error enums.
//!
//! Adapters return these errors across the hexagonal boundary; the macro
//! derives the `thiserror` plumbing and a snake_case constructor per
//! variant so call sites stay terse.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::ids::UserId;

    define_port_error! {
        pub enum SamplePortError {
            Missing { user_id: UserId } => "user {user_id} is missing",
            Storage { message: String } => "storage failed: {message}",
            Offline => "peer is offline",
        }
    }

    #[test]
    fn constructors_accept_into_types() {
        let err = SamplePortError::storage("disk full");
        assert_eq!(err.to_string(), "storage failed: disk full");
    }

    #[test]
    fn typed_fields_render_through_display() {
        let user_id = UserId::random();
        let err = SamplePortError::missing(user_id);
        assert!(err.to_string().contains(&user_id.to_string()));
    }

    #[test]
    fn unit_variants_get_constructors_too() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
    }
}
