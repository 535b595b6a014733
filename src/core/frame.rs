//! # Obfuscated Frame Codec
//!
//! Wraps a payload in a self-describing binary frame whose body is XORed with a
//! keystream carried in the same frame.
//!
//! ## Wire Format
//! ```text
//! [seed(1)] [header(H)] [padding_len(1)] [padding(P)] [keystream(K)] [ciphertext(N)]
//! ```
//! - `header[j] = seed + header_pattern[j]` (mod 256)
//! - `padding_len = seed + P` (mod 256), `P` drawn from `0..=padding_modulus`
//! - `ciphertext[i] = payload[i] ^ keystream[i % K]`
//!
//! `H` and `K` are agreed out of band; `P` is recovered from the frame itself, so the
//! decoder does not need the padding modulus.
//!
//! ## Security
//! This is obfuscation, not encryption. The keystream travels in the clear next to
//! the bytes it masks, and the header only detects accidental corruption or a
//! configuration mismatch.

use crate::config::FrameConfig;
use crate::error::{constants, FingerprintError, FrameViolation, Result};
use crate::core::serialization::{from_canonical_bytes, to_canonical_bytes};
use crate::utils::random::RandomSource;
use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Offsets recovered from a validated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub seed: u8,
    pub padding_length: usize,
    pub keystream_start: usize,
    pub ciphertext_start: usize,
    pub payload_len: usize,
}

impl FrameLayout {
    pub fn keystream<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        &frame[self.keystream_start..self.ciphertext_start]
    }

    pub fn ciphertext<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        &frame[self.ciphertext_start..]
    }
}

/// Exact length of a frame for the given parameters.
pub fn frame_len(
    header_len: usize,
    padding_length: usize,
    keystream_length: usize,
    payload_len: usize,
) -> usize {
    1 + header_len + 1 + padding_length + keystream_length + payload_len
}

/// Serialize `payload` canonically and wrap it in a frame.
///
/// # Errors
/// `ConfigError` when `keystream_length` is 0, `SerializeError` when the payload has
/// no structured-text form.
pub fn encode<T, R>(
    payload: &T,
    header_pattern: &[u8],
    padding_modulus: u8,
    keystream_length: usize,
    rng: &mut R,
) -> Result<Bytes>
where
    T: Serialize + ?Sized,
    R: RandomSource + ?Sized,
{
    let plaintext = to_canonical_bytes(payload)?;
    encode_bytes(&plaintext, header_pattern, padding_modulus, keystream_length, rng)
}

/// Wrap already-serialized bytes in a frame.
pub fn encode_bytes<R>(
    plaintext: &[u8],
    header_pattern: &[u8],
    padding_modulus: u8,
    keystream_length: usize,
    rng: &mut R,
) -> Result<Bytes>
where
    R: RandomSource + ?Sized,
{
    check_keystream_length(keystream_length)?;

    let seed = rng.next_byte();
    let padding_length = (u16::from(rng.next_byte()) % (u16::from(padding_modulus) + 1)) as u8;

    let total = (header_pattern.len() + 2 + usize::from(padding_length))
        .checked_add(keystream_length)
        .and_then(|n| n.checked_add(plaintext.len()))
        .ok_or_else(|| FingerprintError::ConfigError(constants::ERR_FRAME_TOO_LARGE.into()))?;
    let mut frame = BytesMut::with_capacity(total);

    frame.put_u8(seed);
    for &h in header_pattern {
        frame.put_u8(seed.wrapping_add(h));
    }
    frame.put_u8(seed.wrapping_add(padding_length));

    let mut padding = [0u8; u8::MAX as usize];
    let padding = &mut padding[..usize::from(padding_length)];
    rng.fill(padding);
    frame.extend_from_slice(padding);

    let mut keystream = vec![0u8; keystream_length];
    rng.fill(&mut keystream);
    frame.extend_from_slice(&keystream);

    frame.extend(
        plaintext
            .iter()
            .zip(keystream.iter().cycle())
            .map(|(b, k)| b ^ k),
    );

    debug_assert_eq!(frame.len(), total);
    Ok(frame.freeze())
}

/// Validate a frame's header and length and locate its regions.
///
/// # Errors
/// `Validation` when the frame is shorter than `header_len + 2`, a header byte does
/// not match the pattern, or the frame is shorter than padding plus keystream.
pub fn inspect(frame: &[u8], header_pattern: &[u8], keystream_length: usize) -> Result<FrameLayout> {
    check_keystream_length(keystream_length)?;

    let header_len = header_pattern.len();
    let fixed = header_len + 2;
    if frame.len() < fixed {
        return Err(FrameViolation::Truncated {
            len: frame.len(),
            required: fixed,
        }
        .into());
    }

    let seed = frame[0];
    for (index, (&expected, &byte)) in header_pattern.iter().zip(&frame[1..=header_len]).enumerate() {
        let found = byte.wrapping_sub(seed);
        if found != expected {
            return Err(FrameViolation::HeaderMismatch {
                index,
                expected,
                found,
            }
            .into());
        }
    }

    let padding_length = usize::from(frame[1 + header_len].wrapping_sub(seed));
    let keystream_start = fixed + padding_length;
    // An unrepresentable end offset can never fit in the frame
    let required = keystream_start
        .checked_add(keystream_length)
        .unwrap_or(usize::MAX);
    if frame.len() < required {
        return Err(FrameViolation::Truncated {
            len: frame.len(),
            required,
        }
        .into());
    }
    let ciphertext_start = required;

    Ok(FrameLayout {
        seed,
        padding_length,
        keystream_start,
        ciphertext_start,
        payload_len: frame.len() - ciphertext_start,
    })
}

/// Validate a frame and recover its payload bytes without parsing them.
pub fn decode_bytes(frame: &[u8], header_pattern: &[u8], keystream_length: usize) -> Result<Vec<u8>> {
    let layout = inspect(frame, header_pattern, keystream_length)?;
    let keystream = layout.keystream(frame);
    Ok(layout
        .ciphertext(frame)
        .iter()
        .zip(keystream.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect())
}

/// Validate a frame, recover its payload and parse it as `T`.
///
/// Typed floats come back bit-exact; untyped `Value` payloads compare with
/// [`canonical_eq`](crate::core::serialization::canonical_eq).
///
/// # Errors
/// `Validation` for structural failures (see [`inspect`]); `Parse` when the recovered
/// bytes are not valid UTF-8 structured text for `T`.
pub fn decode<T: DeserializeOwned>(
    frame: &[u8],
    header_pattern: &[u8],
    keystream_length: usize,
) -> Result<T> {
    let plaintext = decode_bytes(frame, header_pattern, keystream_length)?;
    from_canonical_bytes(&plaintext)
}

fn check_keystream_length(keystream_length: usize) -> Result<()> {
    if keystream_length == 0 {
        return Err(FingerprintError::ConfigError(constants::ERR_ZERO_KEYSTREAM.into()));
    }
    Ok(())
}

/// Frame codec bound to one [`FrameConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCodec {
    config: FrameConfig,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            config: FrameConfig::default(),
        }
    }
}

impl FrameCodec {
    /// # Errors
    /// `ConfigError` when the keystream length is 0.
    pub fn new(config: FrameConfig) -> Result<Self> {
        check_keystream_length(config.keystream_length)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn encode<T, R>(&self, payload: &T, rng: &mut R) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
        R: RandomSource + ?Sized,
    {
        encode(
            payload,
            &self.config.header_pattern,
            self.config.padding_modulus,
            self.config.keystream_length,
            rng,
        )
    }

    pub fn decode<T: DeserializeOwned>(&self, frame: &[u8]) -> Result<T> {
        decode(frame, &self.config.header_pattern, self.config.keystream_length)
    }

    pub fn inspect(&self, frame: &[u8]) -> Result<FrameLayout> {
        inspect(frame, &self.config.header_pattern, self.config.keystream_length)
    }
}
