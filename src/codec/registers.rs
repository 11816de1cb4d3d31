// Licensed under the Apache-2.0 license

//! ADAU1761 control register map and the reference bring-up table.
//!
//! Offsets are relative to [`R_BASE`]; the codec sees them as 16-bit
//! sub-addresses `R_BASE + offset`.

/// Factory 7-bit address with ADDR1/ADDR0 strapped high.
pub const DEFAULT_ADDRESS: u8 = 0x3B;

/// Sub-address of the first control register.
pub const R_BASE: u16 = 0x4000;

/// Marks the end of a legacy flat `offset, value` table.
pub const SENTINEL: u8 = 0xFF;

pub const R0_CLKCTRL: u8 = 0x00;
/// Start of the 6-byte PLL control block, see [`super::pll::PllControl`].
pub const R1_PLL: u8 = 0x02;
pub const R2_MICJACK: u8 = 0x08;
pub const R3_REC: u8 = 0x09;
pub const R4_RECMXL0: u8 = 0x0A;
pub const R5_RECMXL1: u8 = 0x0B;
pub const R6_RECMXR0: u8 = 0x0C;
pub const R7_RECMXR1: u8 = 0x0D;
pub const R8_LDVOL: u8 = 0x0E;
pub const R9_RDVOL: u8 = 0x0F;
pub const R10_RECMIC: u8 = 0x10;
pub const R11_ALC0: u8 = 0x11;
pub const R12_ALC1: u8 = 0x12;
pub const R13_ALC2: u8 = 0x13;
pub const R14_ALC3: u8 = 0x14;
pub const R15_SP0: u8 = 0x15;
pub const R16_SP1: u8 = 0x16;
pub const R17_CONV0: u8 = 0x17;
pub const R18_CONV1: u8 = 0x18;
pub const R19_ADCCTRL: u8 = 0x19;
pub const R20_LADVOL: u8 = 0x1A;
pub const R21_RADVOL: u8 = 0x1B;
pub const R22_PLAYMXL0: u8 = 0x1C;
pub const R23_PLAYMXL1: u8 = 0x1D;
pub const R24_PLAYMXR0: u8 = 0x1E;
pub const R25_PLAYMXR1: u8 = 0x1F;
pub const R26_PLAYLRMXL: u8 = 0x20;
pub const R27_PLAYLRMXR: u8 = 0x21;
pub const R28_PLAYLRMXM: u8 = 0x22;
pub const R29_PLAYHLVOL: u8 = 0x23;
pub const R30_PLAYHRVOL: u8 = 0x24;
pub const R31_LOLVOL: u8 = 0x25;
pub const R32_LORVOL: u8 = 0x26;
pub const R33_PLAYMO: u8 = 0x27;
pub const R34_POP: u8 = 0x28;
pub const R35_PLAYPWR: u8 = 0x29;
pub const R36_DACCTRL0: u8 = 0x2A;
pub const R37_DACCTRL1: u8 = 0x2B;
pub const R38_DACCTRL2: u8 = 0x2C;
pub const R39_SERPAD: u8 = 0x2D;
pub const R40_CTRLPAD0: u8 = 0x2F;
pub const R41_CTRLPAD1: u8 = 0x30;
pub const R42_JACKPIN: u8 = 0x31;
pub const R67_DEJITTER: u8 = 0x36;
pub const R43_CRC3: u8 = 0xC0;
pub const R44_CRC2: u8 = 0xC1;
pub const R45_CRC1: u8 = 0xC2;
pub const R46_CRC0: u8 = 0xC3;
pub const R47_CRCEN: u8 = 0xC4;
pub const R48_GPIO0: u8 = 0xC6;
pub const R49_GPIO1: u8 = 0xC7;
pub const R50_GPIO2: u8 = 0xC8;
pub const R51_GPIO3: u8 = 0xC9;
pub const R52_DOGEN: u8 = 0xD0;
pub const R53_DOGVAL2: u8 = 0xD1;
pub const R54_DOGVAL1: u8 = 0xD2;
pub const R55_DOGVAL0: u8 = 0xD3;
pub const R56_DOGERR: u8 = 0xD4;
pub const R57_DSPSR: u8 = 0xEB;
pub const R58_SINRT: u8 = 0xF2;
pub const R59_SOUTRT: u8 = 0xF3;
pub const R60_SGPIN: u8 = 0xF4;
pub const R61_DSPEN: u8 = 0xF5;
pub const R62_DSPRUN: u8 = 0xF6;
pub const R63_DSPSLEW: u8 = 0xF7;
pub const R64_SPSR: u8 = 0xF8;
pub const R65_CLKEN0: u8 = 0xF9;
pub const R66_CLKEN1: u8 = 0xFA;

/// `R0_CLKCTRL` core clock enable.
pub const CLKCTRL_COREN: u8 = 1 << 0;

/// One register write of an init table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegisterInitEntry {
    pub offset: u8,
    pub value: u8,
}

impl RegisterInitEntry {
    #[must_use]
    pub const fn new(offset: u8, value: u8) -> Self {
        Self { offset, value }
    }
}

const fn e(offset: u8, value: u8) -> RegisterInitEntry {
    RegisterInitEntry::new(offset, value)
}

/// Line-in / headphone passthrough with the DSP bypassed. Written in order
/// after the core clock is enabled.
pub const DEFAULT_INIT: &[RegisterInitEntry] = &[
    e(R2_MICJACK, 0b0000_0000),
    e(R3_REC, 0b0000_0000),
    e(R4_RECMXL0, 0b0000_0001),
    e(R5_RECMXL1, 0b0000_0101),
    e(R6_RECMXR0, 0b0000_0001),
    e(R7_RECMXR1, 0b0000_0101),
    e(R8_LDVOL, 0b0000_0000),
    e(R9_RDVOL, 0b0000_0000),
    e(R10_RECMIC, 0b0000_0000),
    e(R11_ALC0, 0b0000_0000),
    e(R12_ALC1, 0b0000_0000),
    e(R13_ALC2, 0b0000_0000),
    e(R14_ALC3, 0b0000_0000),
    e(R15_SP0, 0b0000_0000),
    e(R16_SP1, 0b0000_0000),
    e(R17_CONV0, 0b0000_0000),
    e(R18_CONV1, 0b0000_0000),
    e(R19_ADCCTRL, 0b0001_0011),
    e(R20_LADVOL, 0b0000_0000),
    e(R21_RADVOL, 0b0000_0000),
    e(R22_PLAYMXL0, 0b0010_0001),
    e(R23_PLAYMXL1, 0b0000_0000),
    e(R24_PLAYMXR0, 0b0100_0001),
    e(R25_PLAYMXR1, 0b0000_0000),
    e(R26_PLAYLRMXL, 0b0000_0101),
    e(R27_PLAYLRMXR, 0b0001_0001),
    e(R28_PLAYLRMXM, 0b0000_0000),
    e(R29_PLAYHLVOL, 0b1110_0111),
    e(R30_PLAYHRVOL, 0b1110_0111),
    e(R31_LOLVOL, 0b1110_0110),
    e(R32_LORVOL, 0b1110_0110),
    e(R33_PLAYMO, 0b0000_0000),
    e(R34_POP, 0b0000_0000),
    e(R35_PLAYPWR, 0b0000_0011),
    e(R36_DACCTRL0, 0b0000_0011),
    e(R37_DACCTRL1, 0b0000_0000),
    e(R38_DACCTRL2, 0b0000_0000),
    e(R39_SERPAD, 0b1010_1010),
    e(R40_CTRLPAD0, 0b1010_1010),
    e(R41_CTRLPAD1, 0b0000_0000),
    e(R42_JACKPIN, 0b0000_1000),
    e(R67_DEJITTER, 0b0000_0000),
    e(R43_CRC3, 0b0000_0000),
    e(R44_CRC2, 0b0000_0000),
    e(R45_CRC1, 0b0000_0000),
    e(R46_CRC0, 0b0000_0000),
    e(R47_CRCEN, 0b0000_0000),
    e(R48_GPIO0, 0b0000_0000),
    e(R49_GPIO1, 0b0000_0000),
    e(R50_GPIO2, 0b0000_0000),
    e(R51_GPIO3, 0b0000_0000),
    e(R52_DOGEN, 0b0000_0000),
    e(R53_DOGVAL2, 0b0000_0000),
    e(R54_DOGVAL1, 0b0000_0000),
    e(R55_DOGVAL0, 0b0000_0000),
    e(R56_DOGERR, 0b0000_0000),
    e(R57_DSPSR, 0b0000_0001),
    e(R58_SINRT, 0b0000_0001),
    e(R59_SOUTRT, 0b0000_0001),
    e(R60_SGPIN, 0b0000_0000),
    e(R61_DSPEN, 0b0000_0000),
    e(R62_DSPRUN, 0b0000_0000),
    e(R63_DSPSLEW, 0b0000_0000),
    e(R64_SPSR, 0b0000_0000),
    e(R65_CLKEN0, 0b0111_1111),
    e(R66_CLKEN1, 0b0000_0011),
];

/// Entries of a flat `offset, value, offset, value, …, 0xFF` table.
///
/// Iteration stops at the first [`SENTINEL`] in an offset position, or at a
/// trailing odd byte. A value of `0xFF` is a value, not a terminator.
pub fn sentinel_entries(table: &[u8]) -> impl Iterator<Item = RegisterInitEntry> + '_ {
    table.chunks(2).map_while(|pair| match *pair {
        [offset, value] if offset != SENTINEL => Some(RegisterInitEntry::new(offset, value)),
        _ => None,
    })
}
