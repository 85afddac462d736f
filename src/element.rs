//! Element kinds the pool can size buffers for
//!
//! Numeric kernels ask for buffers in elements, not bytes. The pool only needs
//! the byte width of each element, so every supported type maps onto one
//! variant of the closed [`ElementKind`] set.

use std::fmt;

use crate::error::{PoolError, Result};

/// Complex number with interleaved real and imaginary parts
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Single precision complex
pub type Complex32 = Complex<f32>;
/// Double precision complex
pub type Complex64 = Complex<f64>;

/// Closed set of element types backed by the pool
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    F32 = 0,
    C32 = 1,
    F64 = 2,
    C64 = 3,
    I32 = 4,
    U32 = 5,
    I8 = 6,
    U8 = 7,
    I64 = 8,
    U64 = 9,
}

impl ElementKind {
    /// Every supported kind, in discriminant order
    pub const ALL: [ElementKind; 10] = [
        ElementKind::F32,
        ElementKind::C32,
        ElementKind::F64,
        ElementKind::C64,
        ElementKind::I32,
        ElementKind::U32,
        ElementKind::I8,
        ElementKind::U8,
        ElementKind::I64,
        ElementKind::U64,
    ];

    /// Byte width of one element
    pub const fn size_of(self) -> usize {
        match self {
            ElementKind::F32 => std::mem::size_of::<f32>(),
            ElementKind::C32 => std::mem::size_of::<Complex32>(),
            ElementKind::F64 => std::mem::size_of::<f64>(),
            ElementKind::C64 => std::mem::size_of::<Complex64>(),
            ElementKind::I32 => std::mem::size_of::<i32>(),
            ElementKind::U32 => std::mem::size_of::<u32>(),
            ElementKind::I8 => std::mem::size_of::<i8>(),
            ElementKind::U8 => std::mem::size_of::<u8>(),
            ElementKind::I64 => std::mem::size_of::<i64>(),
            ElementKind::U64 => std::mem::size_of::<u64>(),
        }
    }

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::F32 => "f32",
            ElementKind::C32 => "c32",
            ElementKind::F64 => "f64",
            ElementKind::C64 => "c64",
            ElementKind::I32 => "i32",
            ElementKind::U32 => "u32",
            ElementKind::I8 => "i8",
            ElementKind::U8 => "u8",
            ElementKind::I64 => "i64",
            ElementKind::U64 => "u64",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for ElementKind {
    type Error = PoolError;

    fn try_from(value: u32) -> Result<Self> {
        ElementKind::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| {
                PoolError::invalid_parameter("kind", format!("unknown element kind {}", value))
            })
    }
}

/// Rust types that can be stored in pooled buffers
pub trait Element: Copy + Send + Sync + 'static {
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
            }
        )*
    };
}

impl_element! {
    f32 => F32,
    Complex32 => C32,
    f64 => F64,
    Complex64 => C64,
    i32 => I32,
    u32 => U32,
    i8 => I8,
    u8 => U8,
    i64 => I64,
    u64 => U64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementKind::F32.size_of(), 4);
        assert_eq!(ElementKind::C32.size_of(), 8);
        assert_eq!(ElementKind::F64.size_of(), 8);
        assert_eq!(ElementKind::C64.size_of(), 16);
        assert_eq!(ElementKind::I8.size_of(), 1);
        assert_eq!(ElementKind::U64.size_of(), 8);
    }

    #[test]
    fn test_kind_matches_type() {
        assert_eq!(<f32 as Element>::KIND, ElementKind::F32);
        assert_eq!(<Complex64 as Element>::KIND, ElementKind::C64);
        assert_eq!(<u8 as Element>::KIND, ElementKind::U8);
        assert_eq!(<i64 as Element>::KIND.size_of(), std::mem::size_of::<i64>());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ElementKind::C32.to_string(), "c32");
        assert_eq!(format!("{} x {}", 3, ElementKind::U64), "3 x u64");
        let names: Vec<&str> = ElementKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(names.len(), 10);
        assert!(names.iter().all(|name| name.len() <= 3));
    }

    #[test]
    fn test_kind_from_u32() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::try_from(kind as u32).unwrap(), kind);
        }
        assert!(ElementKind::try_from(10).is_err());
    }
}
