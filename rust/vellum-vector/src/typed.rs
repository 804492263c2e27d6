//! Typed fixed-width vectors, one per primitive logical type, and the closed
//! [`AnyVector`] enum over them for type-generic callers.

use vellum_common::{Error, Result, ValidationConfig};
use vellum_memory::BufferAllocator;

use crate::{
    fixed_width::FixedWidthVector, logical_type::LogicalType, value::Value, vector::Vector,
};

macro_rules! typed_vector {
    ($(#[$doc:meta])* $vector:ident, $ty:ty, $logical:ident, $variant:ident, $accessor:ident) => {
        paste::paste! {
            $(#[$doc])*
            #[derive(Debug)]
            pub struct $vector(FixedWidthVector);

            impl $vector {
                pub fn new(
                    allocator: &BufferAllocator,
                    name: impl Into<String>,
                    nullable: bool,
                    config: ValidationConfig,
                ) -> $vector {
                    $vector(FixedWidthVector::new(
                        allocator,
                        name,
                        LogicalType::$logical,
                        nullable,
                        config,
                    ))
                }

                #[doc = concat!("Reads the `", stringify!($ty), "` at row `idx`.")]
                #[inline]
                pub fn [<get_ $accessor>](&self, idx: usize) -> Result<$ty> {
                    self.0.check_read(idx)?;
                    Ok(self.0.data_buffer().[<get_ $accessor>](idx))
                }

                #[doc = concat!("Appends a non-null `", stringify!($ty), "` row.")]
                #[inline]
                pub fn [<write_ $accessor>](&mut self, value: $ty) -> Result<()> {
                    self.0.reserve_row()?;
                    self.0.data_buffer_mut().[<write_ $accessor>](value)?;
                    self.0.write_not_null()
                }
            }

            impl Vector for $vector {
                #[inline]
                fn base(&self) -> &FixedWidthVector {
                    &self.0
                }

                #[inline]
                fn base_mut(&mut self) -> &mut FixedWidthVector {
                    &mut self.0
                }

                fn get_object0(&self, idx: usize) -> Result<Value> {
                    self.[<get_ $accessor>](idx).map(Value::$variant)
                }

                fn write_object0(&mut self, value: Value) -> Result<()> {
                    match value {
                        Value::$variant(value) => self.[<write_ $accessor>](value),
                        other => Err(Error::unsupported_value_kind(
                            self.0.name(),
                            LogicalType::$logical.name(),
                            other.kind_name(),
                        )),
                    }
                }
            }

            impl From<$vector> for AnyVector {
                fn from(vector: $vector) -> AnyVector {
                    AnyVector::$variant(vector)
                }
            }
        }
    };
}

typed_vector!(
    /// A vector of 8-bit signed integers.
    ByteVector, i8, Int8, I8, byte
);
typed_vector!(
    /// A vector of 16-bit signed integers.
    ShortVector, i16, Int16, I16, short
);
typed_vector!(
    /// A vector of 32-bit signed integers.
    IntVector, i32, Int32, I32, int
);
typed_vector!(
    /// A vector of 64-bit signed integers.
    LongVector, i64, Int64, I64, long
);
typed_vector!(
    /// A vector of single-precision floats.
    FloatVector, f32, Float32, F32, float
);
typed_vector!(
    /// A vector of double-precision floats.
    DoubleVector, f64, Float64, F64, double
);

/// Any of the typed fixed-width vectors, selected at runtime by logical type.
#[derive(Debug)]
pub enum AnyVector {
    I8(ByteVector),
    I16(ShortVector),
    I32(IntVector),
    I64(LongVector),
    F32(FloatVector),
    F64(DoubleVector),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyVector::I8($v) => $body,
            AnyVector::I16($v) => $body,
            AnyVector::I32($v) => $body,
            AnyVector::I64($v) => $body,
            AnyVector::F32($v) => $body,
            AnyVector::F64($v) => $body,
        }
    };
}

impl AnyVector {
    /// Creates an empty vector of the given logical type.
    pub fn new(
        allocator: &BufferAllocator,
        name: impl Into<String>,
        logical_type: LogicalType,
        nullable: bool,
        config: ValidationConfig,
    ) -> AnyVector {
        match logical_type {
            LogicalType::Int8 => ByteVector::new(allocator, name, nullable, config).into(),
            LogicalType::Int16 => ShortVector::new(allocator, name, nullable, config).into(),
            LogicalType::Int32 => IntVector::new(allocator, name, nullable, config).into(),
            LogicalType::Int64 => LongVector::new(allocator, name, nullable, config).into(),
            LogicalType::Float32 => FloatVector::new(allocator, name, nullable, config).into(),
            LogicalType::Float64 => DoubleVector::new(allocator, name, nullable, config).into(),
        }
    }
}

impl Vector for AnyVector {
    fn base(&self) -> &FixedWidthVector {
        dispatch!(self, v => v.base())
    }

    fn base_mut(&mut self) -> &mut FixedWidthVector {
        dispatch!(self, v => v.base_mut())
    }

    fn get_object0(&self, idx: usize) -> Result<Value> {
        dispatch!(self, v => v.get_object0(idx))
    }

    fn write_object0(&mut self, value: Value) -> Result<()> {
        dispatch!(self, v => v.write_object0(value))
    }
}
