use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

fn round_trip_test(base_name: &str,ext: &str,dat: &[u8]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join([base_name,ext].concat());
    std::fs::write(&in_path,dat)?;
    let mut cmd = Command::cargo_bin("rskpack")?;
    cmd.arg(&in_path)
        .arg("-c")
        .assert()
        .success();
    let rsk_path = temp_dir.path().join([base_name,".rsk"].concat());
    let mut cmd = Command::cargo_bin("rskpack")?;
    cmd.arg(&rsk_path)
        .arg("-d")
        .assert()
        .success();
    let out_path = temp_dir.path().join(["decompressed_",base_name,ext].concat());
    match std::fs::read(out_path) {
        Ok(v) => assert_eq!(v,dat),
        _ => panic!("unable to read round trip output")
    }
    Ok(())
}

#[test]
fn text_round_trip() -> STDRESULT {
    round_trip_test("sam",".txt",b"I am Sam. Sam I am. I do not like this Sam I am.\n")
}

#[test]
fn repeated_symbol_round_trip() -> STDRESULT {
    round_trip_test("aaaa",".txt",b"AAAAAAAAAAAAAAAA")
}

#[test]
fn binary_round_trip() -> STDRESULT {
    let dat: Vec<u8> = (0u8..=255).cycle().take(1024).collect();
    round_trip_test("all_bytes",".dat",&dat)
}

#[test]
fn no_extension_round_trip() -> STDRESULT {
    round_trip_test("plain","",b"some plain data with no extension")
}

#[test]
fn empty_input_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.txt");
    std::fs::write(&in_path,"")?;
    let mut cmd = Command::cargo_bin("rskpack")?;
    cmd.arg(&in_path)
        .arg("-c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyInput"));
    Ok(())
}

#[test]
fn garbage_container_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("garbage.rsk");
    std::fs::write(&in_path,[0xde,0xad,0xbe,0xef])?;
    let mut cmd = Command::cargo_bin("rskpack")?;
    cmd.arg(&in_path)
        .arg("-d")
        .assert()
        .failure();
    Ok(())
}
