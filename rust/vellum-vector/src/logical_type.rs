/// Logical type of a fixed-width vector's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// IEEE 754 single precision.
    Float32,
    /// IEEE 754 double precision.
    Float64,
}

impl LogicalType {
    pub const ALL: [LogicalType; 6] = [
        LogicalType::Int8,
        LogicalType::Int16,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::Float32,
        LogicalType::Float64,
    ];

    /// Width of a single element, in bytes.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            LogicalType::Int8 => 1,
            LogicalType::Int16 => 2,
            LogicalType::Int32 | LogicalType::Float32 => 4,
            LogicalType::Int64 | LogicalType::Float64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Int8 => "i8",
            LogicalType::Int16 => "i16",
            LogicalType::Int32 => "i32",
            LogicalType::Int64 => "i64",
            LogicalType::Float32 => "f32",
            LogicalType::Float64 => "f64",
        }
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
