//! 결정적 명령 파서.
//!
//! 자유 텍스트를 액션 하나로 변환한다. 소문자화 + trim 후 규칙 그룹을 순서대로
//! 평가하며 첫 매치가 이긴다. 어떤 입력에도 패닉하지 않는다.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use healthops_core::models::action::Action;
use healthops_core::models::dashboard::{canonical_unit, DashboardTab, UNIT_4_WEST};

/// 검색어 최소 길이
const MIN_SEARCH_LEN: usize = 2;
/// 병실 ID 최소 길이
const MIN_ROOM_ID_LEN: usize = 3;

/// 규칙 그룹 (평가 순서대로)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Operational,
    Approval,
    Reset,
    UnitFilter,
    StatusFilter,
    Search,
    OpenRoom,
    SwitchTab,
    Help,
}

/// (그룹, 빌더) 규칙
struct CommandRule {
    group: CommandGroup,
    build: fn(&str) -> Option<Action>,
}

const RULES: &[CommandRule] = &[
    CommandRule {
        group: CommandGroup::Operational,
        build: operational,
    },
    CommandRule {
        group: CommandGroup::Approval,
        build: approval,
    },
    CommandRule {
        group: CommandGroup::Reset,
        build: reset,
    },
    CommandRule {
        group: CommandGroup::UnitFilter,
        build: unit_filter,
    },
    CommandRule {
        group: CommandGroup::StatusFilter,
        build: status_filter,
    },
    CommandRule {
        group: CommandGroup::Search,
        build: search,
    },
    CommandRule {
        group: CommandGroup::OpenRoom,
        build: open_room,
    },
    CommandRule {
        group: CommandGroup::SwitchTab,
        build: switch_tab,
    },
    CommandRule {
        group: CommandGroup::Help,
        build: help,
    },
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Invalid command regex"))
        .collect()
}

// ============================================================
// 패턴
// ============================================================

static EVS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:move|reprioritize|redirect|send)\s+(?:cleaning\s+)?(?:crews?|evs)\s+(?:to|for)\s*(4 west|4w)",
        r"reprioritize\s+evs\s+(?:for|to)\s*(4 west|4w)",
        r"(?:focus|prioritize)\s+cleaning\s+(?:on|for)\s*(4 west|4w)",
    ])
});

static MAINTENANCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:tell|notify|escalate)\s+maintenance\s+(?:to\s+)?(?:prioritize|focus)",
        r"prioritize\s+maintenance\s+(?:for|in)\s*(4 west|4w)",
        r"escalate\s+maintenance\s+(?:for|to)\s*(4 west|4w)",
        r"maintenance\s+(?:prioritize|focus)\s+(?:on\s+)?(4 west|4w)",
    ])
});

static STAFF_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"inform\s+staff\s+(?:to\s+)?(?:focus|prioritize)",
        r"notify\s+staff\s+(?:to\s+)?(?:focus|clean)\s+(?:on\s+)?(4 west|4w)",
        r"(?:staff|crew)\s+(?:focus|prioritize)\s+(?:on\s+)?(4 west|4w)",
    ])
});

static APPROVAL_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"^(?:yes|go ahead|approve|permission granted|do it|proceed)$"]));

static RESET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^(?:clear|reset|show all|remove filters)",
        r"clear filters",
    ])
});

// 병동 토큰 뒤에 단어 문자나 '-'가 오면 안 된다 ("4w-412b"는 병실 ID)
static UNIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:filter|show|view|display)\s*(?:by|for)?\s*(4\s?west|4w|3\s?east|3e|5\s?north|5n|all units)(?:[^\w-]|$)",
        r"^(4\s?west|4w|3\s?east|3e|5\s?north|5n|all units)(?:[^\w-]|$)",
    ])
});

static BLOCKED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"blocked"]));
static READY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"ready"]));
static CLEANING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"cleaning"]));

static SEARCH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:search|find|look up|look for)\s+(?:for\s+)?(?:room\s+)?([\w-]+)",
        r"^room\s+([\w-]+)",
    ])
});

static OPEN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:open|show|view|details?)\s+(?:room\s+)?([\w-]+)",
        r"^room\s+([\w-]+)\s+(?:details?|info)",
    ])
});

static DATA_HEALTH_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"data health|system health|integration"]));
static ALERTS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"alerts?"]));

static HELP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^(?:help|what can you do|how do you work|commands?)",
        r"what can you",
    ])
});

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

/// 첫 번째로 매치된 패턴의 캡처 그룹 1
fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ============================================================
// 규칙 빌더
// ============================================================

fn operational(text: &str) -> Option<Action> {
    if any_match(&EVS_PATTERNS, text) {
        Some(Action::reprioritize_evs(UNIT_4_WEST))
    } else if any_match(&MAINTENANCE_PATTERNS, text) {
        Some(Action::escalate_maintenance(UNIT_4_WEST))
    } else if any_match(&STAFF_PATTERNS, text) {
        Some(Action::inform_staff(UNIT_4_WEST))
    } else {
        None
    }
}

/// 단독 승인 토큰은 첫 제안(EVS 재배치)을 실행한다
fn approval(text: &str) -> Option<Action> {
    any_match(&APPROVAL_PATTERNS, text).then(|| Action::reprioritize_evs(UNIT_4_WEST))
}

fn reset(text: &str) -> Option<Action> {
    any_match(&RESET_PATTERNS, text).then(Action::reset_filters)
}

fn unit_filter(text: &str) -> Option<Action> {
    first_capture(&UNIT_PATTERNS, text)
        .and_then(canonical_unit)
        .map(Action::unit_filter)
}

fn status_filter(text: &str) -> Option<Action> {
    if any_match(&BLOCKED_PATTERNS, text) {
        Some(Action::show_only_blocked())
    } else if any_match(&READY_PATTERNS, text) {
        Some(Action::status_filter("Ready"))
    } else if any_match(&CLEANING_PATTERNS, text) {
        Some(Action::status_filter("Cleaning"))
    } else {
        None
    }
}

fn search(text: &str) -> Option<Action> {
    first_capture(&SEARCH_PATTERNS, text)
        .filter(|term| term.chars().count() >= MIN_SEARCH_LEN)
        .map(Action::search)
}

fn open_room(text: &str) -> Option<Action> {
    first_capture(&OPEN_PATTERNS, text)
        .filter(|id| id.chars().count() >= MIN_ROOM_ID_LEN)
        .map(Action::open_room)
}

fn switch_tab(text: &str) -> Option<Action> {
    if any_match(&DATA_HEALTH_PATTERNS, text) {
        Some(Action::switch_tab(DashboardTab::DataHealth))
    } else if any_match(&ALERTS_PATTERNS, text) {
        Some(Action::switch_tab(DashboardTab::Alerts))
    } else {
        None
    }
}

fn help(text: &str) -> Option<Action> {
    any_match(&HELP_PATTERNS, text).then(Action::show_help)
}

// ============================================================
// 공개 API
// ============================================================

/// 텍스트를 매치된 규칙 그룹과 액션으로 분류
pub fn classify(text: &str) -> Option<(CommandGroup, Action)> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let matched = RULES
        .iter()
        .find_map(|rule| (rule.build)(&normalized).map(|action| (rule.group, action)));

    match &matched {
        Some((group, action)) => debug!(group = ?group, action = %action, "명령 규칙 매치"),
        None => debug!("명령 규칙 매치 없음"),
    }
    matched
}

/// 자유 텍스트를 액션으로 변환. 인식하지 못하면 None.
pub fn parse_command(text: &str) -> Option<Action> {
    classify(text).map(|(_, action)| action)
}
