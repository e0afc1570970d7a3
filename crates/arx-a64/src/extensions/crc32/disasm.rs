use super::{CrcWidth, DecodedInstr, crc32_mnemonic, crc32_variant, reg_name};

pub(super) fn format_crc32(instr: &DecodedInstr) -> String {
    let is_64 = crc32_variant(instr.opid).is_some_and(|(width, _)| width == CrcWidth::Double);
    format!(
        "{} {}, {}, {}",
        crc32_mnemonic(instr.opid),
        reg_name(instr.rd, false),
        reg_name(instr.rn, false),
        reg_name(instr.rm, is_64)
    )
}
