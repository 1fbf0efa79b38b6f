#![no_main]

use libfuzzer_sys::fuzz_target;
use sheet_render::PackedRgba;
use sheet_runtime::SheetConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(color) = PackedRgba::from_hex(source) {
        assert_eq!(PackedRgba::from_hex(&color.to_hex()), Some(color));
    }

    if let Ok(config) = SheetConfig::from_toml_str(source) {
        assert!(config.validate().is_ok());
        assert!(config.max_capture_pixels > 0);
    }
});
