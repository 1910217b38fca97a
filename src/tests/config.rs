use crate::config::{BitTiming, Config, FilterConfig};
use crate::regs::OpMode;

#[test]
fn default_reproduces_deployment_bytes() {
    let config = Config::default();

    assert_eq!(
        BitTiming {
            cfg1: 0x00,
            cfg2: 0xC9,
            cfg3: 0x42
        },
        config.bit_timing
    );
    assert_eq!(
        FilterConfig {
            rxf0: 0x0040,
            rxf1: 0x0060,
            rxm0: 0xC7E0,
            rxm1: 0xFFFF
        },
        config.filters
    );
    assert_eq!([0x01], config.interrupts.into_bytes());
    assert_eq!(OpMode::Normal, config.mode);
}

#[test]
fn standard_positions_id_in_sidh_sidl_word() {
    assert_eq!(0x0840, FilterConfig::standard(0x042));
    assert_eq!(0x0040, FilterConfig::standard(0x002));
    assert_eq!(0xFFE0, FilterConfig::standard(0x7FF));
}
