//! Field Merger: copies the fields of a request payload onto an entity by name.
//!
//! Creation payloads carry plain values and are copied verbatim, zero values included.
//! Update payloads wrap every field in `Option`; only `Some` fields are copied, so an absent
//! field leaves the destination untouched while an explicit zero value still wins.

/// Merges `source` onto `self` in place. Never fails.
pub trait Merge<S> {
    fn merge(&mut self, source: &S);
}

/// Verbatim copy of a creation-shaped field.
pub fn copy_field<T, U>(destination: &mut T, source: &U)
where
    U: Clone + Into<T>,
{
    *destination = source.clone().into();
}

/// Copy of an update-shaped field, skipped when absent.
pub fn copy_present<T, U>(destination: &mut T, source: &Option<U>)
where
    U: Clone + Into<T>,
{
    if let Some(value) = source {
        *destination = value.clone().into();
    }
}

/// Implements [`Merge`] by listing the fields shared by name.
///
/// ```ignore
/// impl_merge!(MusicTrack <- CreateMusicTrack { copy_field: title, artist; });
/// impl_merge!(MusicTrack <- UpdateMusicTrack { copy_present: title, artist; });
/// ```
#[macro_export]
macro_rules! impl_merge {
    ($destination:ident <- $source:ident { $($mode:ident: $($field:ident),+ ;)+ }) => {
        impl $crate::merge::Merge<$source> for $destination {
            fn merge(&mut self, source: &$source) {
                $($(
                    $crate::merge::$mode(&mut self.$field, &source.$field);
                )+)+
            }
        }
    };
}
