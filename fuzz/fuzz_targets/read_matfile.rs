#![no_main]
use ants2fsl::{AffineRecord, MatFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mat) = MatFile::from_bytes(data) {
        for var in mat.variables() {
            let _ = var.get(0, 0);
        }
        if let Ok(record) = AffineRecord::from_mat_file(&mat) {
            let _ = ants2fsl::to_fsl(&record.decompose());
        }
    }
});
