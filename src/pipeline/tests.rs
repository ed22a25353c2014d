// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
use super::*;

use std::string::{String, ToString};

use crate::config::Policy;
use crate::token::{CheckpointA, CheckpointB, Encoder, Token};

const HEADER: &str = "Kanata\t0004\nC=\t0\n";

/// Render the given tokens as a capture, one token per line
fn capture(tokens: &[Token]) -> String {
    let mut res = String::new();
    for token in tokens {
        let mut encoder = Encoder::new([0u8; 16]);
        encoder.encode(token).expect("Could not encode token");
        let (buffer, len) = encoder.finish();
        res.push_str(&hex::Line(&buffer[..len]).to_string());
        res.push('\n');
    }
    res
}

fn convert(capture: &str, params: &Parameters) -> (Result<Report, Error>, String) {
    let mut log = Vec::new();
    let res = run(capture.lines(), &mut log, params);
    let log = String::from_utf8(log).expect("Log is not valid UTF-8");
    (res, log)
}

fn issue(delay: u16, wen: bool, id: u8) -> Token {
    Token {
        cycle_delay: delay,
        checkpoint_a: Some(CheckpointA {
            wen,
            addr: 0x1000 + u32::from(id),
            channel: id % 8,
            id,
        }),
        checkpoint_b: None,
    }
}

fn complete(delay: u16, id: u8) -> Token {
    Token {
        cycle_delay: delay,
        checkpoint_a: None,
        checkpoint_b: Some(CheckpointB { id }),
    }
}

#[test]
fn issue_read() {
    let (res, log) = convert("150000200006\n", &Default::default());
    let report = res.expect("Could not convert capture");
    assert_eq!(
        log,
        [
            HEADER,
            "C\t1\t\n",
            "I\t0\t5\t2\n",
            "L\t0\t1\t@0000010 channel=2 wen=0\n",
            "S\t0\t0\tRd\n",
        ]
        .concat()
    );
    assert_eq!(report.tokens, 1);
    assert_eq!(report.events, 4);
    assert_eq!(report.cycles, 1);
    assert_eq!(
        report.diagnostics,
        [Diagnostic::UnretiredOperations(Unretired {
            in_flight: 1,
            pending_retire: 0
        })]
    );
}

#[test]
fn issue_read_and_respond() {
    let (res, log) = convert("150000200006\n050005\n", &Default::default());
    let report = res.expect("Could not convert capture");
    assert!(log.ends_with("S\t0\t0\tRd\nC\t1\t\nS\t0\t0\tRs\n"));
    assert_eq!(report.tokens, 2);
    assert_eq!(report.events, 6);
    assert_eq!(report.cycles, 2);
    assert_eq!(
        report.diagnostics,
        [Diagnostic::UnretiredOperations(Unretired {
            in_flight: 0,
            pending_retire: 1
        })]
    );
}

#[test]
fn retire_before_idle() {
    let tokens = [issue(2, true, 3), Token::idle()];
    let (res, log) = convert(&capture(&tokens), &Default::default());
    let report = res.expect("Could not convert capture");
    assert_eq!(
        log,
        [
            HEADER,
            "C\t2\t\n",
            "I\t0\t3\t3\n",
            "L\t0\t1\t@0001003 channel=3 wen=1\n",
            "S\t0\t0\tWr\n",
            "C\t1\t\n",
            "R\t0\t0\t\n",
            "C\t16382\t\n",
        ]
        .concat()
    );
    assert!(report.is_clean());
    assert_eq!(report.cycles, 2 + 16383);
}

#[test]
fn truncated_checkpoint_a() {
    let (res, log) = convert("150000200006\n200006\n", &Default::default());
    let report = res.expect("Could not convert capture");
    assert_eq!(log.lines().filter(|l| l.starts_with('I')).count(), 1);
    assert_eq!(report.tokens, 1);
    assert_eq!(
        report.diagnostics[0],
        Diagnostic::IncompleteToken {
            index: 1,
            offset: 6,
            remaining: 3
        }
    );
    assert!(!report.is_clean());
}

#[test]
fn empty_capture() {
    let (res, log) = convert("\n\n", &Default::default());
    let report = res.expect("Could not convert capture");
    assert_eq!(log, HEADER);
    assert_eq!(report, Report::default());
}

#[test]
fn malformed_line() {
    let (res, log) = convert("0005\n15000020000\n", &Default::default());
    match res {
        Err(Error::Line(err)) => {
            assert_eq!(err.line, 2);
            assert_eq!(err.kind, hex::ErrorKind::MalformedLine(11));
        }
        res => panic!("Unexpected result: {res:?}"),
    }
    assert!(log.is_empty());
}

#[test]
fn malformed_token_abort() {
    let (res, log) = convert("150000200006\n0000\n", &Default::default());
    assert!(matches!(
        res,
        Err(Error::Token(token::Error::MalformedToken {
            index: 1,
            offset: 6,
            header: 0
        }))
    ));
    assert!(log.ends_with("S\t0\t0\tRd\n"));
}

#[test]
fn malformed_token_report() {
    let params = Parameters {
        malformed_token: Policy::Report,
        ..Default::default()
    };
    let (res, log) = convert("0000\n150000200006\n050005\n", &params);
    let report = res.expect("Could not convert capture");
    assert_eq!(report.tokens, 2);
    assert_eq!(
        report.diagnostics[0],
        Diagnostic::MalformedToken {
            index: 0,
            offset: 0,
            header: 0
        }
    );
    assert!(log.contains("I\t0\t5\t2\n"));
    assert!(log.ends_with("S\t0\t0\tRs\n"));
}

#[test]
fn duplicate_read() {
    let (res, log) = convert("150000200006\n150000200006\n", &Default::default());
    match res {
        Err(Error::Trace {
            index,
            offset,
            source,
        }) => {
            assert_eq!((index, offset), (1, 6));
            assert_eq!(
                source,
                tracer::Error::DuplicateInFlightId {
                    hw_id: 5,
                    trace_id: 0
                }
            );
        }
        res => panic!("Unexpected result: {res:?}"),
    }
    // Everything before the offending token was written
    assert_eq!(log.lines().filter(|l| l.starts_with('I')).count(), 1);
    assert!(log.ends_with("S\t0\t0\tRd\n"));
}

#[test]
fn orphan_completion_report() {
    let (res, log) = convert("050005\n", &Default::default());
    let report = res.expect("Could not convert capture");
    assert_eq!(log, [HEADER, "C\t1\t\n"].concat());
    assert_eq!(
        report.diagnostics,
        [Diagnostic::OrphanCompletion {
            index: 0,
            offset: 0,
            hw_id: 5
        }]
    );
}

#[test]
fn orphan_completion_abort() {
    let params = Parameters {
        orphan_completion: Policy::Abort,
        ..Default::default()
    };
    let (res, log) = convert("050005\n", &params);
    assert!(matches!(
        res,
        Err(Error::Trace {
            source: tracer::Error::OrphanCompletion { hw_id: 5 },
            ..
        })
    ));
    assert_eq!(log, HEADER);
}

#[test]
fn deterministic() {
    let tokens = [
        issue(1, false, 1),
        issue(4, true, 2),
        complete(1, 1),
        issue(7, false, 1),
        Token {
            checkpoint_b: Some(CheckpointB { id: 1 }),
            ..issue(2, false, 9)
        },
        Token::idle(),
        complete(3, 9),
        Token::idle(),
    ];
    let capture = capture(&tokens);
    let (first, first_log) = convert(&capture, &Default::default());
    let (second, second_log) = convert(&capture, &Default::default());
    let report = first.expect("Could not convert capture");
    assert_eq!(Some(&report), second.as_ref().ok());
    assert_eq!(first_log, second_log);
    assert!(report.is_clean());
    assert_eq!(report.tokens, tokens.len());
    assert_eq!(
        first_log.lines().count(),
        2 + report.events,
        "One line per event after the header"
    );
    // Trace ids are assigned in order of issue
    let issued: Vec<_> = first_log
        .lines()
        .filter(|l| l.starts_with("I\t"))
        .map(|l| l.split('\t').nth(1).unwrap_or_default().to_string())
        .collect();
    assert_eq!(issued, ["0", "1", "2", "3"]);
    // Every operation is retired exactly once
    let retired = first_log.lines().filter(|l| l.starts_with("R\t")).count();
    assert_eq!(retired, 4);
}

#[test]
fn diagnostic_display() {
    let diagnostic = Diagnostic::IncompleteToken {
        index: 1,
        offset: 6,
        remaining: 3,
    };
    assert_eq!(
        diagnostic.to_string(),
        "token 1 at byte 6 is incomplete, discarded 3 bytes"
    );
}
