//! Schemas compiled into the crate, so the toolchain works without a
//! checked-out `schemas/` directory.

/// `(filename, contents)` for every schema shipped with the toolchain.
pub const BUNDLED_SCHEMAS: [(&str, &str); 5] = [
    (
        "opat-1.0.0.json",
        include_str!("../../../schemas/opat-1.0.0.json"),
    ),
    (
        "opat-catalog-1.0.0.json",
        include_str!("../../../schemas/opat-catalog-1.0.0.json"),
    ),
    (
        "opat-catalog-standards-1.0.0.json",
        include_str!("../../../schemas/opat-catalog-standards-1.0.0.json"),
    ),
    (
        "opat-catalog-components-1.0.0.json",
        include_str!("../../../schemas/opat-catalog-components-1.0.0.json"),
    ),
    (
        "opat-catalog-terms-1.0.0.json",
        include_str!("../../../schemas/opat-catalog-terms-1.0.0.json"),
    ),
];
