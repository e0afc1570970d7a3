//! Instruction translation front door.

use arx_a64::{CompositeDecoder, DecodedInstr, HostFeatures, REG_ZR, crc32_variant, soft};
use arx_ir::{Context, GuestRegisters, Interpreter, RegisterFile};
use tracing::debug;

use crate::{Error, Result};

/// Decodes and lifts single A64 instructions for a fixed host.
pub struct Translator {
    decoder: CompositeDecoder,
    features: HostFeatures,
}

impl Translator {
    /// Translator with the standard decoder.
    #[must_use]
    pub fn new(features: HostFeatures) -> Self {
        Self::with_decoder(CompositeDecoder::standard(), features)
    }

    /// Translator with a custom decoder chain.
    #[must_use]
    pub const fn with_decoder(decoder: CompositeDecoder, features: HostFeatures) -> Self {
        Self { decoder, features }
    }

    /// Translator for the running CPU.
    #[must_use]
    pub fn for_host() -> Self {
        Self::new(HostFeatures::host())
    }

    #[must_use]
    pub const fn features(&self) -> HostFeatures {
        self.features
    }

    #[must_use]
    pub const fn decoder(&self) -> &CompositeDecoder {
        &self.decoder
    }

    /// Decode `raw` at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownInstruction`] if no extension decodes `raw`.
    pub fn decode(&self, raw: u32, pc: u64) -> Result<DecodedInstr> {
        self.decoder
            .decode32(raw, pc)
            .ok_or(Error::UnknownInstruction { raw })
    }

    /// Disassemble `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownInstruction`] if no extension decodes `raw`.
    pub fn disasm(&self, raw: u32) -> Result<String> {
        let instr = self.decode(raw, 0)?;
        Ok(self.decoder.disasm(&instr))
    }

    /// Decode and lift `raw` into a fresh context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownInstruction`] if `raw` does not decode and
    /// [`Error::NotLifted`] if its extension declines to lift it.
    pub fn translate(&self, raw: u32, pc: u64) -> Result<Context> {
        let instr = self.decode(raw, pc)?;
        let mut ctx = Context::new();
        if !self.decoder.lift(&mut ctx, &instr, self.features) {
            return Err(Error::NotLifted {
                raw,
                disasm: self.decoder.disasm(&instr),
            });
        }

        let nodes = ctx.graph().len();
        debug!(
            raw,
            pc,
            nodes,
            pclmulqdq = self.features.pclmulqdq,
            "translated"
        );
        #[allow(clippy::cast_precision_loss)]
        metrics::histogram!("arx_graph_nodes").record(nodes as f64);
        Ok(ctx)
    }

    /// Translate `raw` and run it against `regs`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Translator::translate`], or [`Error::Eval`]
    /// if the lifted graph fails to evaluate.
    pub fn execute<R: GuestRegisters + ?Sized>(&self, raw: u32, regs: &mut R) -> Result<()> {
        let ctx = self.translate(raw, 0)?;
        Interpreter::new(ctx.graph()).run(regs)?;
        Ok(())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Outcome of running one CRC32 instruction through both lifting paths and
/// the software routine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crosscheck {
    pub disasm: String,
    /// Destination register, `REG_ZR` when the result is discarded.
    pub rd: u8,
    pub expected: RegisterFile,
    pub hardware: RegisterFile,
    pub fallback: RegisterFile,
}

impl Crosscheck {
    /// Both lifting paths left the registers exactly as the software routine
    /// predicts.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.hardware == self.expected && self.fallback == self.expected
    }

    /// Destination values as (pclmulqdq, fallback, software).
    #[must_use]
    pub fn results(&self) -> (u64, u64, u64) {
        let read = |regs: &RegisterFile| regs.read(self.rd);
        (
            read(&self.hardware),
            read(&self.fallback),
            read(&self.expected),
        )
    }

    /// Error out if the paths disagree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mismatch`] with the three destination values when
    /// the check is not consistent.
    pub fn verify(&self) -> Result<()> {
        if self.is_consistent() {
            return Ok(());
        }
        let (hardware, fallback, software) = self.results();
        Err(Error::Mismatch {
            disasm: self.disasm.clone(),
            hardware,
            fallback,
            software,
        })
    }
}

/// Run the CRC32 instruction `raw` on copies of `regs` through the
/// `PCLMULQDQ` path, the fallback path, and the software routine directly.
///
/// # Errors
///
/// Returns [`Error::UnknownInstruction`] or [`Error::NotLifted`] if `raw` is
/// not a CRC32 instruction, and [`Error::Eval`] if either graph fails to
/// evaluate.
pub fn crosscheck(raw: u32, regs: &RegisterFile) -> Result<Crosscheck> {
    let hw = Translator::new(HostFeatures::all());
    let sw = Translator::new(HostFeatures::none());
    let instr = hw.decode(raw, 0)?;
    let (width, poly) = crc32_variant(instr.opid).ok_or_else(|| Error::NotLifted {
        raw,
        disasm: hw.decoder().disasm(&instr),
    })?;

    let read = |reg: u8| if reg == REG_ZR { 0 } else { regs.read(reg) };
    let mut expected = regs.clone();
    #[allow(clippy::cast_possible_truncation)]
    let crc = read(instr.rn) as u32;
    let data = read(instr.rm) & width.mask();
    if instr.rd != REG_ZR {
        expected.write(instr.rd, u64::from(soft::crc32(poly, width, crc, data)));
    }

    let mut hardware = regs.clone();
    hw.execute(raw, &mut hardware)?;
    let mut fallback = regs.clone();
    sw.execute(raw, &mut fallback)?;

    Ok(Crosscheck {
        disasm: hw.decoder().disasm(&instr),
        rd: instr.rd,
        expected,
        hardware,
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_a64::{CrcPolynomial, CrcWidth, encode_crc32};

    #[test]
    fn test_translate_unknown_word() {
        let translator = Translator::new(HostFeatures::none());
        assert!(matches!(
            translator.translate(0xD503_201F, 0),
            Err(Error::UnknownInstruction { raw: 0xD503_201F })
        ));
    }

    #[test]
    fn test_execute() {
        let translator = Translator::new(HostFeatures::all());
        let mut regs = RegisterFile::new().with(1, 0xFFFF_FFFF).with(2, 0xFF);
        translator.execute(0x1AC2_4020, &mut regs).unwrap();
        assert_eq!(regs.read(0), 0x00FF_FFFF);
    }

    #[test]
    fn test_empty_decoder_rejects() {
        let translator =
            Translator::with_decoder(CompositeDecoder::empty(), HostFeatures::none());
        assert!(translator.disasm(0x1AC2_4020).is_err());
    }

    #[test]
    fn test_crosscheck_consistent() {
        let regs = RegisterFile::new()
            .with(1, 0x1234_5678)
            .with(2, 0xDEAD_BEEF_0BAD_F00D);
        for width in CrcWidth::ALL {
            for poly in CrcPolynomial::ALL {
                let report = crosscheck(encode_crc32(width, poly, 0, 1, 2), &regs).unwrap();
                assert!(report.is_consistent(), "{}", report.disasm);
                assert!(report.verify().is_ok());
            }
        }
    }

    #[test]
    fn test_crosscheck_zero_register_destination() {
        let regs = RegisterFile::new().with(1, 5).with(2, 6);
        let raw = encode_crc32(CrcWidth::Word, CrcPolynomial::Iso, REG_ZR, 1, 2);
        let report = crosscheck(raw, &regs).unwrap();
        assert_eq!(report.expected, regs);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_crosscheck_zero_register_source() {
        let regs = RegisterFile::new().with(REG_ZR, u64::MAX).with(2, 0x31);
        let raw = encode_crc32(CrcWidth::Byte, CrcPolynomial::Iso, 0, REG_ZR, 2);
        let report = crosscheck(raw, &regs).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.results(), (0x51DE_003A, 0x51DE_003A, 0x51DE_003A));
    }

    #[test]
    fn test_mismatch_reported() {
        let regs = RegisterFile::new();
        let mut report = crosscheck(0x1AC2_4020, &regs).unwrap();
        report.fallback.write(0, 1);
        assert!(matches!(
            report.verify(),
            Err(Error::Mismatch { fallback: 1, .. })
        ));
    }
}
