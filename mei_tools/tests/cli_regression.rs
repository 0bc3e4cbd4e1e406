use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_script(dir: &Path, name: &str, commands: Value) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, json!({ "scr": commands }).to_string())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn mei_tools(args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_mei_tools"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .context("executing mei_tools")
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().context("temp path is not valid UTF-8")
}

#[test]
fn lines_prints_indexed_dialogue() -> Result<()> {
    let dir = tempdir()?;
    let script = write_script(
        dir.path(),
        "scene01.json",
        json!([
            {"cmd0": "背景", "arg0": "bg_shrine"},
            {"cmd0": "梨花：私服", "arg1": "にぱ～☆"},
            {"cmd0": "：", "arg1": "The cicadas cry."},
            {"cmd1": "謎の声", "arg1": "……"}
        ]),
    )?;
    let script_str = path_str(&script)?;

    let output = mei_tools(&["lines", script_str])?;
    assert!(output.status.success(), "lines exited with {:?}", output.status);
    let stdout = String::from_utf8(output.stdout)?;
    let expected = format!(
        concat!(
            "{}\n1:\n= Rika (Casual) =\nにぱ～☆\n\n",
            "2:\nSystem:\nThe cicadas cry.\n\n",
            "3:\n= 謎の声 =\n……\n\n"
        ),
        script_str
    );
    assert_eq!(stdout, expected);
    Ok(())
}

#[test]
fn lines_json_uses_name_overrides() -> Result<()> {
    let dir = tempdir()?;
    let script = write_script(
        dir.path(),
        "scene02.json",
        json!([{"cmd0": "赤坂：", "arg1": "Hello"}]),
    )?;
    let names = dir.path().join("names.json");
    fs::write(&names, r#"{"赤坂": "Akasaka"}"#)?;

    let output = mei_tools(&[
        "lines",
        path_str(&script)?,
        "--names",
        path_str(&names)?,
        "--format",
        "json",
    ])?;
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed[0]["lines"][0]["speaker"], json!("= Akasaka ="));
    assert_eq!(parsed[0]["lines"][0]["raw_speaker"], json!("赤坂："));
    assert_eq!(parsed[0]["lines"][0]["index"], json!(0));
    Ok(())
}

#[test]
fn discover_reports_once_per_script_and_survives_failures() -> Result<()> {
    let dir = tempdir()?;
    let first = write_script(
        dir.path(),
        "a.json",
        json!([
            {"cmd0": "：", "arg1": "Hello"},
            {"cmd0": "foo", "arg0": "bar"},
            {"cmd0": "foo", "arg0": "baz"}
        ]),
    )?;
    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"scr": [{"arg0": "no opcode"}]}"#)?;
    let second = write_script(dir.path(), "b.json", json!([{"cmd1": "foo", "arg0": 1}]))?;

    let output = mei_tools(&[
        "discover",
        path_str(&first)?,
        path_str(&broken)?,
        path_str(&second)?,
    ])?;
    assert!(!output.status.success(), "a broken script must fail the batch");

    let stdout = String::from_utf8(output.stdout)?;
    let stubs: Vec<&str> = stdout.lines().filter(|line| !line.starts_with("//")).collect();
    assert_eq!(
        stubs,
        vec![
            r#"foo(raw, cmd, arg0) // observed: "bar""#,
            "foo(raw, cmd, arg0) // observed: 1"
        ]
    );

    let stderr = String::from_utf8(output.stderr)?;
    assert!(
        stderr.contains("1 of 3 script(s) failed"),
        "missing batch summary: {stderr}"
    );
    assert!(stderr.contains("neither a cmd0 nor a cmd1"), "{stderr}");

    let fail_fast = mei_tools(&[
        "discover",
        "--fail-fast",
        path_str(&broken)?,
        path_str(&second)?,
    ])?;
    assert!(!fail_fast.status.success());
    assert!(String::from_utf8(fail_fast.stdout)?.trim().is_empty());
    Ok(())
}

#[test]
fn assets_collects_across_scripts() -> Result<()> {
    let dir = tempdir()?;
    let first = write_script(
        dir.path(),
        "a.json",
        json!([
            {"cmd0": "charaload", "arg0": "mion_uniform"},
            {"cmd0": "bgm", "arg0": "daybreak", "arg1": "RANDOM"}
        ]),
    )?;
    let second = write_script(
        dir.path(),
        "b.json",
        json!([
            {"cmd1": "背景", "arg0": "bg_school"},
            {"cmd1": "se2", "arg0": "door_open", "arg1": 1}
        ]),
    )?;

    let output = mei_tools(&[
        "assets",
        "--format",
        "json",
        path_str(&first)?,
        path_str(&second)?,
    ])?;
    assert!(output.status.success());
    let catalog: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        catalog,
        json!({
            "outfits": ["mion_uniform"],
            "backgrounds": ["bg_school"],
            "music": ["daybreak"],
            "sound_effects": ["door_open"],
            "shaders": []
        })
    );
    Ok(())
}

#[test]
fn strict_turns_binding_errors_into_failures() -> Result<()> {
    let dir = tempdir()?;
    let script = write_script(
        dir.path(),
        "bad_arity.json",
        json!([{"cmd0": "serifclose", "arg0": 1}]),
    )?;
    let script_str = path_str(&script)?;

    assert!(mei_tools(&["discover", script_str])?.status.success());
    let strict = mei_tools(&["discover", "--strict", script_str])?;
    assert!(!strict.status.success());
    assert!(String::from_utf8(strict.stderr)?.contains("serifclose"));
    Ok(())
}

#[test]
fn strict_json_output_omits_failed_scripts() -> Result<()> {
    let dir = tempdir()?;
    let failing = write_script(
        dir.path(),
        "failing.json",
        json!([
            {"cmd0": "wait", "arg0": 1, "arg1": 2},
            {"cmd0": "foo", "arg0": "x"}
        ]),
    )?;
    let clean = write_script(dir.path(), "clean.json", json!([{"cmd0": "bar", "arg0": 1}]))?;
    let failing_str = path_str(&failing)?;
    let clean_str = path_str(&clean)?;

    let lenient = mei_tools(&["discover", "--format", "json", failing_str, clean_str])?;
    assert!(lenient.status.success());
    let parsed: Value = serde_json::from_slice(&lenient.stdout)?;
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));

    let strict = mei_tools(&[
        "discover",
        "--strict",
        "--format",
        "json",
        failing_str,
        clean_str,
    ])?;
    assert!(!strict.status.success());
    let parsed: Value = serde_json::from_slice(&strict.stdout)?;
    assert_eq!(
        parsed,
        json!([{
            "file": clean_str,
            "discovered": [{
                "opcode": "bar",
                "first_index": 0,
                "observed": [{"position": 0, "value": 1}]
            }]
        }])
    );

    let text = mei_tools(&["discover", "--strict", failing_str, clean_str])?;
    let stdout = String::from_utf8(text.stdout)?;
    assert!(!stdout.contains("foo("), "{stdout}");
    assert!(stdout.contains("bar(raw, cmd, arg0)"), "{stdout}");
    Ok(())
}

#[test]
fn opcodes_lists_registry() -> Result<()> {
    let output = mei_tools(&["opcodes"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("bgm2 -> bgm(filename, time: int = -1)"));
    assert!(stdout.contains("変数 -> set_var(name, value, shift: int = 0)"));
    assert_eq!(stdout.lines().count(), 26);
    Ok(())
}
