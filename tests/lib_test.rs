//! Library integration tests.

use std::time::Duration;

use serde_json::json;
use stdcli::flags::{parse, parse_duration, Flag, FlagSet, Parsed};
use stdcli::layout::{Columns, Info, OutputFormat, Table};
use stdcli::render::{strip_tag, strip_tags, visible_width, TagTable, Writer};
use stdcli::validate;
use stdcli::{CliError, Exit, ExitCoder};

#[test]
fn error_types_are_public() {
    let err = CliError::UnknownFlag {
        flag: "--nope".into(),
    };
    assert_eq!(err.to_string(), "unknown flag: --nope");
    assert_eq!(err.exit_code(), None);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> stdcli::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn exit_sentinel_carries_code() {
    let exit = Exit::new(3);
    assert_eq!(exit.exit_code(), 3);
    assert_eq!(exit.to_string(), "exit 3");
    assert_eq!(stdcli::exit(3).exit_code(), Some(3));
}

#[test]
fn args_validator_pluralizes() {
    let one = validate::args(1);
    let two = validate::args(2);
    let a = vec!["a".to_string()];
    let ab = vec!["a".to_string(), "b".to_string()];
    let abc = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    assert!(one(&a).is_ok());
    assert_eq!(one(&ab).unwrap_err().to_string(), "1 arg required");
    assert!(two(&ab).is_ok());
    assert_eq!(two(&a).unwrap_err().to_string(), "2 args required");
    assert_eq!(two(&abc).unwrap_err().to_string(), "2 args required");
}

#[test]
fn args_between_is_inclusive() {
    let check = validate::args_between(1, 3);
    for n in 0..=4 {
        let args: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        assert_eq!(check(&args).is_ok(), (1..=3).contains(&n), "count {}", n);
    }
}

#[test]
fn strip_tags_unwinds_layers() {
    assert_eq!(strip_tags("<h1>a</h1> <value>b</value>"), "a b");
    assert_eq!(strip_tags("<h1><value>x</value></h1>"), "x");
    assert_eq!(strip_tag("<id>only</id>"), "only");
    assert_eq!(visible_width("<h1>abc</h1>"), 3);
}

#[test]
fn disabled_color_is_plain_text() {
    let (writer, out, _) = Writer::capture(TagTable::standard());
    writer.write("<h1>Title</h1>").unwrap();
    assert_eq!(out.contents(), "Title");
    assert!(!out.contents().bytes().any(|b| b == 0x1b));
}

#[test]
fn parse_flags_and_positionals() {
    let mut flags = FlagSet::new(vec![
        Flag::bool("force", "").short('f'),
        Flag::duration("wait", "").default_value(Duration::from_secs(5)),
    ]);
    let args: Vec<String> = ["rm", "-f", "x"].iter().map(|s| s.to_string()).collect();

    let parsed = parse(&mut flags, &args).unwrap();
    assert_eq!(parsed, Parsed::Args(vec!["rm".to_string(), "x".to_string()]));
    assert!(flags.bool("force"));
    assert_eq!(flags.duration("wait"), Duration::from_secs(5));
    assert!(flags.value("wait").is_none());
}

#[test]
fn duration_literals() {
    assert_eq!(parse_duration("1h2m3s").unwrap(), Duration::from_secs(3723));
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert!(parse_duration("5").is_err());
    assert!(parse_duration("-1s").is_err());
}

#[test]
fn columns_table_and_info_render() {
    let (writer, out, _) = Writer::capture(TagTable::standard());

    let mut columns = Columns::new(&writer);
    columns.append(["a", "b"]);
    columns.print().unwrap();

    let mut table = Table::new(&writer, OutputFormat::Text, ["ID", "Name"]);
    table.append(vec![json!(1), json!("web")]);
    table.print().unwrap();

    let mut info = Info::new(&writer, OutputFormat::Text);
    info.add("Name", "web");
    info.print().unwrap();

    assert_eq!(out.contents(), "a  b\nID  Name\n1   web\nNAME  web\n");
}

#[test]
fn table_json_keeps_native_types() {
    let (writer, out, _) = Writer::capture(TagTable::standard());
    let mut table = Table::new(&writer, OutputFormat::Json, ["ID", "Name"]);
    table.append(vec![json!(1), json!("a")]);
    table.print().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
    assert_eq!(parsed, json!([{"id": 1, "name": "a"}]));
}
