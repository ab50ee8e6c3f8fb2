//! Fixed-width call encoder
//!
//! Packs the sorted price set into the arguments of the median transition.
//! Every array argument has exactly `oracles_length` slots; slots past the
//! real reports are padded with fixed filler values.
//!
//! Wire grammar of a single argument:
//! - unsigned integers carry their width: `3u8`, `101000000u64`
//! - booleans are `true` / `false`
//! - addresses and signatures are emitted verbatim
//! - arrays are `[a, b, c]` (one space after each comma)

use super::{OracleReport, DUMMY_ADDRESS, DUMMY_SIGNATURE, MEDIANATOR_ORACLES_LENGTH};
use crate::error::{MedianatorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub oracles_length: usize,
    pub dummy_address: String,
    pub dummy_signature: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            oracles_length: MEDIANATOR_ORACLES_LENGTH,
            dummy_address: DUMMY_ADDRESS.to_string(),
            dummy_signature: DUMMY_SIGNATURE.to_string(),
        }
    }
}

/// Arguments of one median submission, already padded to capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    /// Number of real (non-filler) entries
    pub oracle_count: u8,
    pub prices: Vec<u64>,
    pub oracles: Vec<String>,
    pub signatures: Vec<String>,
}

impl EncodedCall {
    /// `[count, prices, oracles, signatures]` in wire form
    pub fn inputs(&self) -> Vec<String> {
        vec![
            encode_u8(self.oracle_count),
            encode_array(&self.prices, |p| encode_u64(*p)),
            encode_array(&self.oracles, |a| encode_address(a)),
            encode_array(&self.signatures, |s| encode_signature(s)),
        ]
    }
}

pub struct CallEncoder {
    config: EncoderConfig,
}

impl CallEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn encode(&self, sorted: &[OracleReport]) -> Result<EncodedCall> {
        let capacity = self.config.oracles_length;
        if sorted.len() > capacity {
            return Err(MedianatorError::CapacityExceeded {
                len: sorted.len(),
                capacity,
            });
        }
        let oracle_count = to_unsigned::<u8>(sorted.len() as i128, 8)?;

        let prices = sorted
            .iter()
            .map(|r| to_unsigned::<u64>(r.price.raw_units(), 64))
            .collect::<Result<Vec<_>>>()?;
        let oracles: Vec<String> = sorted.iter().map(|r| r.oracle.clone()).collect();
        let signatures: Vec<String> = sorted.iter().map(|r| r.signature.clone()).collect();

        Ok(EncodedCall {
            oracle_count,
            prices: pad(prices, capacity, 0)?,
            oracles: pad(oracles, capacity, self.config.dummy_address.clone())?,
            signatures: pad(signatures, capacity, self.config.dummy_signature.clone())?,
        })
    }
}

impl Default for CallEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

/// Encode with the default capacity and filler values
pub fn encode(sorted: &[OracleReport]) -> Result<EncodedCall> {
    CallEncoder::default().encode(sorted)
}

fn pad<T: Clone>(mut values: Vec<T>, length: usize, fill: T) -> Result<Vec<T>> {
    if values.len() > length {
        return Err(MedianatorError::CapacityExceeded {
            len: values.len(),
            capacity: length,
        });
    }
    values.resize(length, fill);
    Ok(values)
}

fn to_unsigned<T: TryFrom<i128>>(value: i128, bits: u32) -> Result<T> {
    T::try_from(value).map_err(|_| MedianatorError::OutOfRange {
        value: value.to_string(),
        bits,
    })
}

pub fn encode_u8(value: u8) -> String {
    format!("{}u8", value)
}

pub fn encode_u64(value: u64) -> String {
    format!("{}u64", value)
}

pub fn encode_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

pub fn encode_address(value: &str) -> String {
    value.to_string()
}

pub fn encode_signature(value: &str) -> String {
    value.to_string()
}

pub fn encode_array<T>(values: &[T], encoder: impl Fn(&T) -> String) -> String {
    let items: Vec<String> = values.iter().map(encoder).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medianator::OraclePrice;

    fn reports(n: usize) -> Vec<OracleReport> {
        (0..n)
            .map(|i| {
                OracleReport::new(
                    format!("aleo1oracle{}", i),
                    format!("sign1sig{}", i),
                    OraclePrice::from_raw_price(100_000_000 + i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn pads_to_fixed_capacity() {
        let call = encode(&reports(3)).unwrap();

        assert_eq!(call.oracle_count, 3);
        assert_eq!(call.prices.len(), MEDIANATOR_ORACLES_LENGTH);
        assert_eq!(call.oracles.len(), MEDIANATOR_ORACLES_LENGTH);
        assert_eq!(call.signatures.len(), MEDIANATOR_ORACLES_LENGTH);

        assert_eq!(&call.prices[..3], &[100_000_000, 100_000_001, 100_000_002]);
        assert_eq!(call.oracles[2], "aleo1oracle2");
        assert_eq!(call.signatures[0], "sign1sig0");

        for i in 3..MEDIANATOR_ORACLES_LENGTH {
            assert_eq!(call.prices[i], 0);
            assert_eq!(call.oracles[i], DUMMY_ADDRESS);
            assert_eq!(call.signatures[i], DUMMY_SIGNATURE);
        }
    }

    #[test]
    fn full_capacity_has_no_filler() {
        let call = encode(&reports(MEDIANATOR_ORACLES_LENGTH)).unwrap();
        assert_eq!(call.oracle_count as usize, MEDIANATOR_ORACLES_LENGTH);
        assert!(!call.oracles.iter().any(|a| a == DUMMY_ADDRESS));
    }

    #[test]
    fn over_capacity_fails() {
        let err = encode(&reports(MEDIANATOR_ORACLES_LENGTH + 1)).unwrap_err();
        assert_eq!(
            err,
            MedianatorError::CapacityExceeded {
                len: 17,
                capacity: 16
            }
        );
    }

    #[test]
    fn capacity_and_filler_follow_config() {
        let encoder = CallEncoder::new(EncoderConfig {
            oracles_length: 4,
            dummy_address: "aleo1dummy".to_string(),
            dummy_signature: "sign1dummy".to_string(),
        });
        let call = encoder.encode(&reports(1)).unwrap();
        assert_eq!(call.prices, vec![100_000_000, 0, 0, 0]);
        assert_eq!(call.oracles[3], "aleo1dummy");
        assert_eq!(call.signatures[1], "sign1dummy");

        assert!(matches!(
            encoder.encode(&reports(5)),
            Err(MedianatorError::CapacityExceeded { len: 5, capacity: 4 })
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let bad = vec![OracleReport::new("aleo1x", "sign1x", OraclePrice::from_raw_price(-1i64))];
        assert_eq!(
            encode(&bad).unwrap_err(),
            MedianatorError::OutOfRange {
                value: "-1".to_string(),
                bits: 64
            }
        );
    }

    #[test]
    fn inputs_follow_wire_grammar() {
        let encoder = CallEncoder::new(EncoderConfig {
            oracles_length: 3,
            dummy_address: "aleo1dummy".to_string(),
            dummy_signature: "sign1dummy".to_string(),
        });
        let call = encoder.encode(&reports(2)).unwrap();
        assert_eq!(
            call.inputs(),
            vec![
                "2u8".to_string(),
                "[100000000u64, 100000001u64, 0u64]".to_string(),
                "[aleo1oracle0, aleo1oracle1, aleo1dummy]".to_string(),
                "[sign1sig0, sign1sig1, sign1dummy]".to_string(),
            ]
        );
    }

    #[test]
    fn primitive_encodings() {
        assert_eq!(encode_u8(16), "16u8");
        assert_eq!(encode_u64(u64::MAX), "18446744073709551615u64");
        assert_eq!(encode_bool(true), "true");
        assert_eq!(encode_bool(false), "false");
        assert_eq!(encode_array::<u64>(&[], |v| encode_u64(*v)), "[]");
    }
}
