use crate::error::LogoTableError;

/// The six structural contexts a position of a sequence can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureContext {
    Hairpin,
    Inner,
    Bulge,
    Multi,
    Dangling,
    Paired,
}

impl StructureContext {
    pub const COUNT: usize = 6;

    pub const ALL: [StructureContext; StructureContext::COUNT] = [
        StructureContext::Hairpin,
        StructureContext::Inner,
        StructureContext::Bulge,
        StructureContext::Multi,
        StructureContext::Dangling,
        StructureContext::Paired,
    ];

    pub fn symbol(self) -> char {
        match self {
            StructureContext::Hairpin => 'H',
            StructureContext::Inner => 'I',
            StructureContext::Bulge => 'B',
            StructureContext::Multi => 'M',
            StructureContext::Dangling => 'D',
            StructureContext::Paired => 'P',
        }
    }

    fn index(self) -> usize {
        match self {
            StructureContext::Hairpin => 0,
            StructureContext::Inner => 1,
            StructureContext::Bulge => 2,
            StructureContext::Multi => 3,
            StructureContext::Dangling => 4,
            StructureContext::Paired => 5,
        }
    }
}

// The predictor emits the first five contexts; pairing probability is the
// complement of their sum.
const STORED_CONTEXTS: usize = StructureContext::COUNT - 1;

/// Per-position context probabilities, converted from the predictor's
/// linear output buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMatrix {
    values: Vec<[f64; StructureContext::COUNT]>,
}

impl ProfileMatrix {
    /// Converts the predictor's linear buffer into per-position rows. The
    /// buffer is context-major: all values for one context are contiguous,
    /// so position `pos` of context `k` lives at `pos + k * length`.
    pub fn from_linear(linear: &[f64], length: usize) -> Result<Self, LogoTableError> {
        if linear.len() != STORED_CONTEXTS * length {
            return Err(LogoTableError::MalformedModel(format!(
                "profile buffer holds {} values, expected {} for {} positions",
                linear.len(),
                STORED_CONTEXTS * length,
                length
            )));
        }
        let mut values = Vec::with_capacity(length);
        for pos in 0..length {
            let mut row = [0.0f64; StructureContext::COUNT];
            let mut stored_sum = 0.0f64;
            for k in 0..STORED_CONTEXTS {
                let value = linear[pos + k * length];
                if !value.is_finite() {
                    return Err(LogoTableError::MalformedModel(format!(
                        "profile value at position {pos}, context {k} is not finite"
                    )));
                }
                row[k] = value;
                stored_sum += value;
            }
            row[STORED_CONTEXTS] = (1.0 - stored_sum).max(0.0);
            values.push(row);
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn probability(&self, position: usize, context: StructureContext) -> f64 {
        self.values[position][context.index()]
    }
}

/// Uppercases a nucleotide sequence, maps U to T, and rejects anything
/// outside the ACGTU alphabet.
pub fn validate_sequence(sequence: &str) -> Result<String, LogoTableError> {
    let mut out = String::with_capacity(sequence.len());
    for ch in sequence.chars() {
        let upper = ch.to_ascii_uppercase();
        match upper {
            'A' | 'C' | 'G' | 'T' => out.push(upper),
            'U' => out.push('T'),
            _ => {
                return Err(LogoTableError::MalformedModel(format!(
                    "sequence {sequence} contains invalid character {ch}"
                )));
            }
        }
    }
    Ok(out)
}
