mod util;

use std::fs;
use std::process::Command;

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use ants2fsl::{convert_file, AffineRecord, ConvertError, MatFile, MatVariable, Stage};

use util::{itk_bytes, read_fsl, rotation_record, save_record, translation_record, TRANSLATION_FSL};

const BIN: &str = env!("CARGO_BIN_EXE_ants2fsl");

#[test]
fn translation_end_to_end() {
    let (dir, input) = save_record(&translation_record());
    let output = dir.path().join("affine.fsl.mat");
    let _ = convert_file(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), TRANSLATION_FSL);
}

#[test]
fn translation_values() {
    let (dir, input) = save_record(&translation_record());
    let output = dir.path().join("affine.fsl.mat");
    let m = convert_file(&input, &output).unwrap();
    let expected = [
        [1.00001913, -0.00006981, 0.00007933, 2.28938563],
        [0.00007714, 1.00004904, -0.000033, 3.94338752],
        [-0.00001758, 0.00001716, 0.99997364, -5.94182688],
        [0.0, 0.0, 0.0, 1.0],
    ];
    for (r, row) in expected.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            assert_abs_diff_eq!(m[(r, c)], *v, epsilon = 1e-6);
        }
    }
}

#[test]
fn output_shape() {
    let (dir, input) = save_record(&rotation_record());
    let output = dir.path().join("affine.fsl.mat");
    let _ = convert_file(&input, &output).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.ends_with('\n'));
    let rows = read_fsl(&output);
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.len() == 4));
}

#[test]
fn bottom_row_is_homogeneous() {
    let (dir, input) = save_record(&rotation_record());
    let output = dir.path().join("affine.fsl.mat");
    let _ = convert_file(&input, &output).unwrap();
    let rows = read_fsl(&output);
    for (v, e) in rows[3].iter().zip(&[0.0, 0.0, 0.0, 1.0]) {
        assert_abs_diff_eq!(*v, *e, epsilon = 1e-6);
    }
}

#[test]
fn deterministic() {
    let (dir, input) = save_record(&rotation_record());
    let first = dir.path().join("first.mat");
    let second = dir.path().join("second.mat");
    let _ = convert_file(&input, &first).unwrap();
    let _ = convert_file(&input, &second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn reads_itk_layout() {
    let record = translation_record();
    let dir = tempdir().unwrap();
    let input = dir.path().join("itk.mat");
    fs::write(&input, itk_bytes(record.parameters(), record.fixed())).unwrap();
    assert_eq!(AffineRecord::from_file(&input).unwrap(), record);

    let output = dir.path().join("affine.fsl.mat");
    let _ = convert_file(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), TRANSLATION_FSL);
}

#[test]
fn overwrites_existing_output() {
    let (dir, input) = save_record(&translation_record());
    let output = dir.path().join("affine.fsl.mat");
    fs::write(&output, "stale").unwrap();
    let _ = convert_file(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), TRANSLATION_FSL);
}

#[test]
fn missing_input() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("affine.fsl.mat");
    let err = convert_file(dir.path().join("nope.mat"), &output).unwrap_err();
    assert_eq!(err.stage(), Stage::Load);
    assert!(!output.exists());
}

#[test]
fn missing_keys_leave_no_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.mat");
    MatFile::new(vec![MatVariable::new("fixed", 3, 1, vec![0.; 3])])
        .to_file_v4(&input)
        .unwrap();
    let output = dir.path().join("affine.fsl.mat");
    match convert_file(&input, &output) {
        Err(ConvertError::MissingVariable(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn unwritable_output() {
    let (dir, input) = save_record(&translation_record());
    let output = dir.path().join("no_such_dir").join("affine.fsl.mat");
    let err = convert_file(&input, &output).unwrap_err();
    assert_eq!(err.stage(), Stage::Write);
}

#[test]
fn cli_success() {
    let (dir, input) = save_record(&translation_record());
    let output = dir.path().join("affine.fsl.mat");
    let status = Command::new(BIN)
        .arg("--input-path")
        .arg(&input)
        .arg("--output-path")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), TRANSLATION_FSL);
}

#[test]
fn cli_malformed_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.mat");
    MatFile::new(vec![MatVariable::new("something_else", 1, 1, vec![1.])])
        .to_file_v4(&input)
        .unwrap();
    let output = dir.path().join("affine.fsl.mat");
    let out = Command::new(BIN)
        .arg("--input-path")
        .arg(&input)
        .arg("--output-path")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("decompose failed"), "stderr: {}", stderr);
    assert!(!output.exists());
}

#[test]
fn cli_garbage_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("garbage.mat");
    fs::write(&input, b"not a mat file").unwrap();
    let output = dir.path().join("affine.fsl.mat");
    let out = Command::new(BIN)
        .arg("--input-path")
        .arg(&input)
        .arg("--output-path")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("load failed"));
    assert!(!output.exists());
}
