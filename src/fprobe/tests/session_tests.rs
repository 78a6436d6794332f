// fprobe/tests/session_tests.rs

use fprobe::{DecodeError, ElementType, ProbeError, Session};
use gdbmirs::{parse_lines, DebuggerControl, MiError, Response};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Answers each command with the next scripted MI block.
#[derive(Default)]
struct ScriptedGdb {
    replies: VecDeque<&'static str>,
    stop: Option<&'static str>,
    commands: Vec<String>,
}

impl ScriptedGdb {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn with_stop(mut self, stop: &'static str) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl DebuggerControl for ScriptedGdb {
    fn write(&mut self, command: &str) -> gdbmirs::Result<Vec<Response>> {
        self.commands.push(command.to_string());
        match self.replies.pop_front() {
            Some(reply) => parse_lines(reply),
            None => Err(MiError::Exited {
                command: command.to_string(),
            }),
        }
    }

    fn wait_for_stop(&mut self) -> gdbmirs::Result<Vec<Response>> {
        match self.stop.take() {
            Some(reply) => parse_lines(reply),
            None => Err(MiError::Timeout {
                command: "*stopped".to_string(),
                timeout_ms: 10,
            }),
        }
    }
}

const DONE: &str = "^done\n(gdb) \n";
const VAR_CREATED: &str =
    "^done,name=\"temp__\",numchild=\"3\",type=\"real(kind=8) (3)\",thread-id=\"1\",has_more=\"0\"\n(gdb) \n";
const BREAKPOINT_STOP: &str = r#"*stopped,reason="breakpoint-hit",disp="keep",bkptno="1",frame={addr="0x0000555555555189",func="MAIN__",args=[],file="simple.f90",fullname="/tmp/test/simple.f90",line="8",arch="i386:x86-64"},thread-id="1",stopped-threads="all",core="3"
"#;

#[test]
fn test_load_array_end_to_end() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^done,type=\"real(kind=8) (3)\"\n(gdb) \n",
        DONE,
        "^done,value=\"(1.5, 2.5, 3.5)\"\n(gdb) \n",
    ]);
    let mut session = Session::new(gdb);

    let array = session.load_array("y").unwrap();
    assert_eq!(array.element_type(), ElementType::F64);
    assert_eq!(array.shape(), &[3]);
    assert_eq!(array.as_f64().unwrap().as_slice().unwrap(), &[1.5, 2.5, 3.5]);

    let gdb = session.into_inner();
    assert_eq!(
        gdb.commands,
        vec![
            "-var-create temp__ * y",
            "-var-info-type temp__",
            "-var-delete temp__",
            "-data-evaluate-expression y",
        ]
    );
}

#[test]
fn test_temp_var_is_deleted_when_type_query_fails() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^error,msg=\"Variable object not found\"\n(gdb) \n",
        DONE,
    ]);
    let mut session = Session::new(gdb).with_temp_var_name("probe_var");

    assert_eq!(session.query_type("y").unwrap(), None);
    let gdb = session.into_inner();
    assert_eq!(gdb.commands.last().map(String::as_str), Some("-var-delete probe_var"));
}

#[test]
fn test_temp_var_is_deleted_when_gdb_exits() {
    let gdb = ScriptedGdb::new(&[VAR_CREATED]);
    let mut session = Session::new(gdb);

    let err = session.query_type("y").unwrap_err();
    assert!(matches!(err, ProbeError::Control(MiError::Exited { .. })));
    let gdb = session.into_inner();
    assert_eq!(gdb.commands.len(), 3);
    assert_eq!(gdb.commands[2], "-var-delete temp__");
}

#[test]
fn test_missing_type_is_no_type_info() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^error,msg=\"No type\"\n(gdb) \n",
        DONE,
    ]);
    let mut session = Session::new(gdb);
    let err = session.load_array("nothere").unwrap_err();
    assert!(matches!(err, ProbeError::NoTypeInfo { ref expression } if expression == "nothere"));
    assert_eq!(err.to_string(), "Could not probe variable 'nothere' info");
}

#[test]
fn test_unparseable_type() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^done,type=\"Type point = (real x, real y)\"\n(gdb) \n",
        DONE,
    ]);
    let mut session = Session::new(gdb);
    let err = session.load_array("p").unwrap_err();
    assert!(matches!(err, ProbeError::UnparseableType { .. }));
}

#[test]
fn test_unsupported_element_type() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^done,type=\"logical(kind=4) (2)\"\n(gdb) \n",
        DONE,
        "^done,value=\"(.TRUE., .FALSE.)\"\n(gdb) \n",
    ]);
    let mut session = Session::new(gdb);
    match session.load_array("flags") {
        Err(ProbeError::Decode {
            expression,
            source: DecodeError::UnsupportedType { base_type, .. },
        }) => {
            assert_eq!(expression, "flags");
            assert_eq!(base_type, "logical");
        }
        other => panic!("expected UnsupportedType, got {:?}", other),
    }
}

#[test]
fn test_error_result_raises_debugger_message() {
    let gdb = ScriptedGdb::new(&["^error,msg=\"No symbol \\\"zz\\\" in current context.\"\n(gdb) \n"]);
    let mut session = Session::new(gdb);
    let err = session.evaluate("zz").unwrap_err();
    assert_eq!(err.to_string(), "No symbol \"zz\" in current context.");
}

#[test]
fn test_missing_result_record() {
    let gdb = ScriptedGdb::new(&["~\"just talk\\n\"\n(gdb) \n"]);
    let mut session = Session::new(gdb);
    let err = session.run_or_raise("-gdb-version").unwrap_err();
    assert!(matches!(err, ProbeError::MissingResult { .. }));
}

#[test]
fn test_read_array_variable() {
    let gdb = ScriptedGdb::new(&[
        "^done,value=\"(1, 2.5, -3)\"\n(gdb) \n",
        "^done,value=\"(1, <optimized out>, 3)\"\n(gdb) \n",
    ]);
    let mut session = Session::new(gdb);

    let values = session.read_array_variable::<f64>("x").unwrap();
    assert_eq!(values.to_vec(), vec![1.0, 2.5, -3.0]);

    let err = session.read_array_variable::<f64>("x").unwrap_err();
    assert!(matches!(
        err,
        ProbeError::Decode {
            source: DecodeError::InvalidElement { index: 1, .. },
            ..
        }
    ));
}

#[test]
fn test_configure_and_load() {
    let gdb = ScriptedGdb::new(&[DONE, DONE, "^done\n(gdb) \n"]);
    let mut session = Session::new(gdb);
    session
        .configure(&["print elements 0", "print repeats 0"])
        .unwrap();
    session.load_program(Path::new("/tmp/my build/simple")).unwrap();

    let gdb = session.into_inner();
    assert_eq!(gdb.commands[0], "-gdb-set print elements 0");
    assert_eq!(gdb.commands[1], "-gdb-set print repeats 0");
    assert_eq!(gdb.commands[2], "-file-exec-and-symbols \"/tmp/my build/simple\"");
}

#[test]
fn test_run_waits_for_stop() {
    let gdb = ScriptedGdb::new(&["^running\n*running,thread-id=\"all\"\n(gdb) \n"])
        .with_stop(BREAKPOINT_STOP);
    let mut session = Session::new(gdb);
    let stopped = session.run().unwrap();
    assert_eq!(stopped.payload_str("reason"), Some("breakpoint-hit"));
}

#[test]
fn test_run_to_exit_is_not_stopped() {
    let gdb = ScriptedGdb::new(&["^running\n(gdb) \n"])
        .with_stop("*stopped,reason=\"exited-normally\"\n");
    let mut session = Session::new(gdb);
    match session.run() {
        Err(ProbeError::NotStopped { reason }) => assert_eq!(reason, "exited-normally"),
        other => panic!("expected NotStopped, got {:?}", other),
    }
}

#[test]
fn test_current_frame_and_location() {
    let frame_reply = r#"^done,frame={level="0",addr="0x0000555555555189",func="MAIN__",file="simple.f90",fullname="/tmp/test/simple.f90",line="3",arch="i386:x86-64"}
(gdb) 
"#;
    let gdb = ScriptedGdb::new(&[frame_reply, frame_reply]);
    let mut session = Session::new(gdb);

    let frame = session.current_frame().unwrap();
    assert_eq!(frame.func, "MAIN__");
    assert_eq!(frame.file, "simple.f90");
    assert_eq!(frame.fullname, PathBuf::from("/tmp/test/simple.f90"));
    assert_eq!(frame.line, 3);

    let source = "program simple\n  real :: y(3)\n  y = 1.0\n  print *, y\nend program\n";
    let html = session.current_location_html(Some(source), 1).unwrap();
    assert!(html.contains("fn: MAIN__ @ line: 3"));
    assert!(html.contains("y = 1.0"));
    assert!(!html.contains("program simple"));
}

#[test]
fn test_probe_type_parses_reported_type() {
    let gdb = ScriptedGdb::new(&[
        VAR_CREATED,
        "^done,type=\"integer(kind=4) (0:9,2)\"\n(gdb) \n",
        DONE,
        VAR_CREATED,
        "^done,type=\"Type point\"\n(gdb) \n",
        DONE,
    ]);
    let mut session = Session::new(gdb);

    let descriptor = session.probe_type("grid").unwrap().unwrap();
    assert_eq!(descriptor.base_type, "integer");
    assert_eq!(descriptor.shape, vec![10, 2]);
    assert_eq!(descriptor.lower_bounds, vec![0, 1]);

    assert_eq!(session.probe_type("p").unwrap(), None);
    assert_eq!(session.control_mut().commands.len(), 6);
}

#[test]
fn test_frame_without_fullname_is_malformed() {
    let gdb = ScriptedGdb::new(&[
        "^done,frame={level=\"0\",addr=\"0x1189\",func=\"MAIN__\",file=\"simple.f90\",line=\"3\"}\n(gdb) \n",
    ]);
    let mut session = Session::new(gdb);
    let err = session.current_frame().unwrap_err();
    assert!(matches!(err, ProbeError::MalformedReply { ref command, .. } if command == "-stack-info-frame"));
    let message = err.to_string();
    assert!(message.starts_with("Malformed reply to '-stack-info-frame'"));
    assert!(message.contains("fullname"));
}
