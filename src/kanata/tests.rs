// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
extern crate alloc;

use super::*;

use alloc::string::ToString;

use crate::tracer::Stage;

macro_rules! line_test {
    ($n:ident, $e:expr, $l:literal) => {
        #[test]
        fn $n() {
            assert_eq!(Line(&$e).to_string(), $l);
        }
    };
}

#[test]
fn header() {
    assert_eq!(Header.to_string(), "Kanata\t0004\nC=\t0");
}

line_test!(cycle, Event::Cycle(1), "C\t1\t");
line_test!(cycle_idle, Event::Cycle(16383), "C\t16383\t");
line_test!(
    issue,
    Event::Issue {
        id: 0,
        hw_id: 5,
        channel: 2
    },
    "I\t0\t5\t2"
);
line_test!(
    label_read,
    Event::Label {
        id: 0,
        addr: 0x10,
        channel: 2,
        wen: false
    },
    "L\t0\t1\t@0000010 channel=2 wen=0"
);
line_test!(
    label_write,
    Event::Label {
        id: 12,
        addr: 0x3f_ffff,
        channel: 7,
        wen: true
    },
    "L\t12\t1\t@03fffff channel=7 wen=1"
);
line_test!(
    stage_write,
    Event::Stage {
        id: 3,
        stage: Stage::WriteComplete
    },
    "S\t3\t0\tWr"
);
line_test!(
    stage_read,
    Event::Stage {
        id: 3,
        stage: Stage::ReadIssued
    },
    "S\t3\t0\tRd"
);
line_test!(
    stage_response,
    Event::Stage {
        id: 3,
        stage: Stage::ResponseReceived
    },
    "S\t3\t0\tRs"
);
line_test!(retire, Event::Retire { id: 42 }, "R\t42\t42\t");
