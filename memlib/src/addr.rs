use std::fmt;
use thiserror::Error;

/// Width of every simulated address, in bits
pub const ADDRESS_WIDTH: u32 = 64;

/// Raised when a cache cannot be constructed from the given shape parameters.
/// Identifies the offending parameter
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("total cache size needs to be a power of two, got {0}")]
    TotalSize(u64),
    #[error("block size needs to be a power of two, got {0}")]
    BlockSize(u64),
    #[error("associativity needs to be a power of two, got {0}")]
    Associativity(u64),
    #[error("block size {block_size} x associativity {associativity} does not leave room for any set in {total_size} bytes")]
    SetCount {
        total_size: u64,
        block_size: u64,
        associativity: u64,
    },
}

/// Raised when a value cannot be represented in the requested bit width.
/// This is a configuration defect, not a recoverable condition
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value {value:#x} does not fit in {width} bits")]
pub struct WidthError {
    pub value: u64,
    pub width: u32,
}

/// The shape of one cache, fixed at construction
///
/// All derived quantities (set count, field widths) are computed once here, so
/// the hot decomposition path is pure mask and shift arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    total_size: u64,
    block_size: u64,
    associativity: u64,
    num_sets: u64,
    offset_bits: u32,
    set_bits: u32,
}

/// An address split into its cache-relative fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    pub offset: u64,
    pub set_index: u64,
    pub tag: u64,
}

/// A human-readable view of how one geometry slices one address.
/// Field values are paired with their fixed-width bit strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBreakdown {
    pub address: u64,
    pub address_bits: String,
    pub offset: u64,
    pub offset_bits: String,
    pub set_index: u64,
    pub set_bits: String,
    pub tag: u64,
    pub tag_bits: String,
}

impl Geometry {
    /// Validates the shape parameters and derives the field widths
    ///
    /// Total size, block size, and associativity must each be a positive power
    /// of two, and a block times the associativity must fit within the total
    /// size so at least one set exists. Powers of two divide exactly, so the
    /// set count is then itself a power of two
    pub fn new(
        total_size: u64,
        block_size: u64,
        associativity: u64,
    ) -> Result<Self, GeometryError> {
        if !total_size.is_power_of_two() {
            return Err(GeometryError::TotalSize(total_size));
        }
        if !block_size.is_power_of_two() {
            return Err(GeometryError::BlockSize(block_size));
        }
        if !associativity.is_power_of_two() {
            return Err(GeometryError::Associativity(associativity));
        }
        let set_count_error = GeometryError::SetCount {
            total_size,
            block_size,
            associativity,
        };
        let set_bytes = block_size
            .checked_mul(associativity)
            .ok_or(set_count_error)?;
        if set_bytes > total_size {
            return Err(set_count_error);
        }
        let num_sets = total_size / set_bytes;
        Ok(Self {
            total_size,
            block_size,
            associativity,
            num_sets,
            offset_bits: block_size.trailing_zeros(),
            set_bits: num_sets.trailing_zeros(),
        })
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn associativity(&self) -> u64 {
        self.associativity
    }

    pub fn num_sets(&self) -> u64 {
        self.num_sets
    }

    /// Width of the offset field, `log2(block_size)`
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the set index field, `log2(num_sets)`. Zero for a single-set cache
    pub fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Width of the tag field, whatever the offset and set fields leave over
    pub fn tag_bits(&self) -> u32 {
        ADDRESS_WIDTH - self.offset_bits - self.set_bits
    }

    /// Splits an address into offset, set index, and tag
    ///
    /// Pure and total: any 64-bit address decomposes without error, and
    /// decomposing twice gives the same result. The set index is 0 when the
    /// cache has a single set
    pub fn decompose(&self, address: u64) -> Decomposition {
        Decomposition {
            offset: address & (self.block_size - 1),
            set_index: (address >> self.offset_bits) & (self.num_sets - 1),
            tag: address >> (self.offset_bits + self.set_bits),
        }
    }

    /// Builds the diagnostic breakdown of an address under this geometry
    pub fn breakdown(&self, address: u64) -> AddressBreakdown {
        let Decomposition {
            offset,
            set_index,
            tag,
        } = self.decompose(address);
        AddressBreakdown {
            address,
            address_bits: bit_string(address, ADDRESS_WIDTH),
            offset,
            offset_bits: bit_string(offset, self.offset_bits),
            set_index,
            set_bits: bit_string(set_index, self.set_bits),
            tag,
            tag_bits: bit_string(tag, self.tag_bits()),
        }
    }
}

impl fmt::Display for AddressBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Address: {}", self.address_bits)?;
        writeln!(f, "Offset bits: {}, Offset: {}", self.offset_bits, self.offset)?;
        writeln!(f, "Tag bits: {}, Tag: {}", self.tag_bits, self.tag)?;
        write!(f, "Set bits: {}, Set: {}", self.set_bits, self.set_index)
    }
}

/// Encodes a value as a fixed-width binary string
///
/// Fails when the value needs more bits than the requested width; an overflow
/// here means the caller's geometry or address arithmetic is wrong, so it is
/// surfaced instead of truncated
///
/// # Examples
///
/// ```
/// use memlib::addr::encode;
/// assert_eq!(encode(10, 8).unwrap(), "00001010");
/// assert!(encode(16, 4).is_err());
/// ```
pub fn encode(value: u64, width: u32) -> Result<String, WidthError> {
    if width < u64::BITS && value >> width != 0 {
        return Err(WidthError { value, width });
    }
    Ok(bit_string(value, width))
}

// Callers must have masked the value to the width already
fn bit_string(value: u64, width: u32) -> String {
    if width == 0 {
        return String::new();
    }
    let width = width as usize;
    format!("{value:0width$b}")
}
