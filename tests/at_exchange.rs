//! End-to-end command exchanges against the mock transport.

mod common;

use atline::{MultilineResponse, SinglelineResponse, NOT_A_RESULT_CODE};
use common::{exchange, lines, mock_protocol, WAIT};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn command_returns_result_code_of_final_line() {
    let (protocol, mock) = mock_protocol();
    let code = exchange(&protocol, &mock, &["OK"], |at| {
        at.command("AT", Some(WAIT)).unwrap()
    });
    assert_eq!(code, 0);
    assert_eq!(mock.write_log(), ["AT"]);
}

#[test]
fn command_maps_error_final_line() {
    let (protocol, mock) = mock_protocol();
    let code = exchange(&protocol, &mock, &["ERROR"], |at| {
        at.command("AT+BOGUS", Some(WAIT)).unwrap()
    });
    assert_eq!(code, 4);
}

#[test]
fn device_error_report_ends_the_exchange() {
    let (protocol, mock) = mock_protocol();
    let snapshot = exchange(&protocol, &mock, &["+CME ERROR: 3"], |at| {
        at.send("AT+CPIN?", Some(WAIT)).unwrap()
    });
    assert_eq!(snapshot, lines(&["+CME ERROR: 3"]));
    // The error report is final but not a result code.
    let code = exchange(&protocol, &mock, &["+CME ERROR: 3"], |at| {
        at.command("AT+CPIN?", Some(WAIT)).unwrap()
    });
    assert_eq!(code, NOT_A_RESULT_CODE);
}

#[test]
fn multiline_strips_echo_and_status_line() {
    let (protocol, mock) = mock_protocol();
    let response = exchange(&protocol, &mock, &["ATI", "Model X", "Rev 2", "OK"], |at| {
        at.multiline("ATI", "", Some(WAIT)).unwrap()
    });
    assert_eq!(response, MultilineResponse::Lines(lines(&["Model X", "Rev 2"])));
}

#[test]
fn singleline_strips_prefix_and_trims() {
    let (protocol, mock) = mock_protocol();
    let response = exchange(&protocol, &mock, &["+CSQ: 18,99", "OK"], |at| {
        at.singleline("AT+CSQ", "+CSQ:", Some(WAIT)).unwrap()
    });
    assert_eq!(response, SinglelineResponse::Line("18,99".to_string()));
}

#[test]
fn singleline_reports_not_found_without_matching_line() {
    let (protocol, mock) = mock_protocol();
    let response = exchange(&protocol, &mock, &["OK"], |at| {
        at.singleline("AT+CGSN", "+CGSN:", Some(WAIT)).unwrap()
    });
    assert_eq!(response, SinglelineResponse::NotFound);
}

#[test]
fn singleline_passes_failure_status_through() {
    let (protocol, mock) = mock_protocol();
    let response = exchange(&protocol, &mock, &["ERROR"], |at| {
        at.singleline("AT+CSQ", "+CSQ:", Some(WAIT)).unwrap()
    });
    assert_eq!(response, SinglelineResponse::Status(4));
}

#[test]
fn timeout_with_no_reply_returns_sentinel() {
    let (protocol, mock) = mock_protocol();
    let timeout = Some(Duration::from_millis(50));

    let code = exchange(&protocol, &mock, &[], move |at| {
        at.command("AT", timeout).unwrap()
    });
    assert_eq!(code, NOT_A_RESULT_CODE);

    let response = exchange(&protocol, &mock, &[], move |at| {
        at.multiline("ATI", "", timeout).unwrap()
    });
    assert_eq!(response, MultilineResponse::Status(NOT_A_RESULT_CODE));
}

#[test]
fn late_reply_after_timeout_routes_as_unsolicited() {
    let (protocol, mock) = mock_protocol();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    protocol.register("+CSQ", move |line: &str| {
        sink.lock().unwrap().push(line.to_string())
    });

    // The device answers too late: the exchange has already timed out.
    let code = exchange(&protocol, &mock, &[], |at| {
        at.command("AT+CSQ", Some(Duration::from_millis(50))).unwrap()
    });
    assert_eq!(code, NOT_A_RESULT_CODE);
    protocol.handle_line("+CSQ: 18,99");
    protocol.handle_line("OK");

    // The stale data line went to its handler, not into any buffer; the
    // stale "OK" had no handler and was dropped.
    assert_eq!(seen.lock().unwrap().as_slice(), ["+CSQ: 18,99"]);

    // The next exchange sees only its own reply.
    let snapshot = exchange(&protocol, &mock, &["+CREG: 1", "OK"], |at| {
        at.send("AT+CREG?", Some(WAIT)).unwrap()
    });
    assert_eq!(snapshot, lines(&["+CREG: 1", "OK"]));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn timeout_still_drains_partial_reply() {
    let (protocol, mock) = mock_protocol();
    let snapshot = exchange(&protocol, &mock, &["+CSQ: 18,99"], |at| {
        at.send("AT+CSQ", Some(Duration::from_millis(80))).unwrap()
    });
    assert_eq!(snapshot, lines(&["+CSQ: 18,99"]));
}

#[test]
fn empty_lines_are_discarded_everywhere() {
    let (protocol, mock) = mock_protocol();
    let snapshot = exchange(&protocol, &mock, &["", "OK", ""], |at| {
        at.send("AT", Some(WAIT)).unwrap()
    });
    assert_eq!(snapshot, lines(&["OK"]));
    // Idle path: an empty line must not reach the dispatcher either.
    protocol.handle_line("");
}

#[test]
fn write_failure_surfaces_as_transport_error() {
    let (protocol, mock) = mock_protocol();
    mock.fail_next_write();
    let result = protocol.command("AT", Some(Duration::from_millis(50)));
    assert!(result.is_err());
    // The monitor stays usable afterwards.
    let code = exchange(&protocol, &mock, &["OK"], |at| {
        at.command("AT", Some(WAIT)).unwrap()
    });
    assert_eq!(code, 0);
}

#[test]
fn concurrent_callers_get_non_interleaved_buffers() {
    let (protocol, mock) = mock_protocol();
    const CALLERS: usize = 4;

    let workers: Vec<_> = (0..CALLERS)
        .map(|i| {
            let caller = Arc::clone(&protocol);
            thread::spawn(move || {
                let cmd = format!("AT+T{i}");
                let snapshot = caller.send(&cmd, Some(WAIT)).unwrap();
                (cmd, snapshot)
            })
        })
        .collect();

    // Play the device: answer each command as it appears, echoing the
    // command name in the data line so crossed responses are detectable.
    for _ in 0..CALLERS {
        let cmd = mock.take_write(WAIT).expect("missing command write");
        protocol.handle_line(&format!("{cmd}: reply"));
        protocol.handle_line("OK");
    }

    for worker in workers {
        let (cmd, snapshot) = worker.join().expect("caller thread panicked");
        assert_eq!(snapshot, vec![format!("{cmd}: reply"), "OK".to_string()]);
    }
}
