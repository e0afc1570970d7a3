//! Command-line value parsing.

use crate::{Error, Result};

/// Parse a 32-bit instruction word written in hex, with or without `0x`.
///
/// # Errors
///
/// Returns [`Error::ParseWord`] if `s` is not a hex number that fits in 32
/// bits.
pub fn parse_word(s: &str) -> Result<u32> {
    let digits = strip_hex_prefix(s.trim());
    if digits.is_empty() {
        return Err(Error::ParseWord(s.to_string()));
    }
    u32::from_str_radix(&digits.replace('_', ""), 16).map_err(|_| Error::ParseWord(s.to_string()))
}

/// Parse a `N=VALUE` register assignment. `VALUE` is decimal, or hex with a
/// `0x` prefix.
///
/// # Errors
///
/// Returns [`Error::ParseReg`] if `s` is malformed, the register is not in
/// `0..=31`, or the value does not fit in 64 bits.
pub fn parse_reg(s: &str) -> Result<(u8, u64)> {
    let err = || Error::ParseReg(s.to_string());
    let (reg, value) = s.split_once('=').ok_or_else(err)?;
    let reg = reg.trim();
    let reg = reg
        .strip_prefix(['x', 'w'])
        .unwrap_or(reg)
        .parse::<u8>()
        .map_err(|_| err())?;
    if usize::from(reg) >= arx_ir::NUM_REGS {
        return Err(err());
    }

    let value = value.trim().replace('_', "");
    let digits = strip_hex_prefix(&value);
    let value = if digits.len() == value.len() {
        value.parse::<u64>()
    } else {
        u64::from_str_radix(digits, 16)
    }
    .map_err(|_| err())?;
    Ok((reg, value))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("0x1ac24020").unwrap(), 0x1AC2_4020);
        assert_eq!(parse_word("9AC25C20").unwrap(), 0x9AC2_5C20);
        assert_eq!(parse_word("0x1AC2_4020").unwrap(), 0x1AC2_4020);
        assert!(matches!(parse_word("0x"), Err(Error::ParseWord(_))));
        assert!(matches!(parse_word("xyz"), Err(Error::ParseWord(_))));
        assert!(matches!(
            parse_word("0x1_0000_0000"),
            Err(Error::ParseWord(_))
        ));
    }

    #[test]
    fn test_parse_reg() {
        assert_eq!(parse_reg("1=42").unwrap(), (1, 42));
        assert_eq!(parse_reg("x2=0xffffffff").unwrap(), (2, 0xFFFF_FFFF));
        assert_eq!(parse_reg("w31=0x_dead").unwrap(), (31, 0xDEAD));
        assert!(matches!(parse_reg("32=1"), Err(Error::ParseReg(_))));
        assert!(matches!(parse_reg("1"), Err(Error::ParseReg(_))));
        assert!(matches!(parse_reg("1=abc"), Err(Error::ParseReg(_))));
        assert!(matches!(parse_reg("1=0x"), Err(Error::ParseReg(_))));
        assert_eq!(parse_reg("3=0XFF").unwrap(), (3, 0xFF));
    }
}
