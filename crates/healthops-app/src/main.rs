//! # healthops-app
//!
//! Healthops Agent 바이너리 진입점.
//! 설정/로깅 초기화, 어댑터 와이어링, 대화형 REPL.

mod demo_data;
mod host;
mod toast;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use healthops_assistant::session::{AssistantSession, SessionState};
use healthops_core::config::{AppConfig, API_KEY_ENV};
use healthops_core::config_manager::ConfigManager;
use healthops_core::models::chat::ChatRole;
use healthops_core::models::dashboard::ReadinessStatus;
use healthops_core::ports::context_source::DashboardContextSource;
use healthops_network::ai_chat_client::RemoteChatClient;

use crate::demo_data::demo_dashboard;
use crate::host::DashboardHost;
use crate::toast::ConsoleToast;

/// Healthops Agent
///
/// 병실 준비 대시보드용 명령 어시스턴트
#[derive(Parser, Debug)]
#[command(name = "healthops")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// AI API 키 (비어 있으면 결정적 명령만 사용)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// 모델 이름 오버라이드
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn")]
    log_level: String,
}

/// 설정 로드 (실패 시 기본 설정, 매니저 없음)
fn load_config(args: &Args) -> (Option<ConfigManager>, AppConfig) {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let (manager, mut config) = match manager {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            let config = manager.effective();
            (Some(manager), config)
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본 설정 사용: {e}");
            let mut config = AppConfig::default_config();
            config.apply_env_overrides();
            (None, config)
        }
    };

    config.override_api_key(args.api_key.clone());
    if let Some(model) = args.model.as_ref().filter(|m| !m.trim().is_empty()) {
        config.ai.model = model.clone();
    }
    (manager, config)
}

/// 설정 파일을 다시 읽어 어시스턴트 설정만 교체
///
/// AI 연결 설정은 재시작해야 반영된다.
fn reload_config(manager: Option<&ConfigManager>, session: &mut AssistantSession) {
    let Some(manager) = manager else {
        println!("  설정 파일 없이 실행 중");
        return;
    };
    match manager.reload() {
        Ok(()) => {
            let assistant = manager.effective().assistant;
            println!(
                "  설정 다시 로드: max_round_trips={} prefer_local_commands={}",
                assistant.max_round_trips, assistant.prefer_local_commands
            );
            session.set_config(assistant);
        }
        Err(e) => {
            warn!("설정 다시 로드 실패: {e}");
            println!("  다시 로드 실패, 기존 설정 유지: {e}");
        }
    }
}

fn print_banner(ai_enabled: bool) {
    println!();
    println!("┌──────────────────────────────────────────────────────────┐");
    println!("│  Healthops Agent · room readiness assistant              │");
    if ai_enabled {
        println!("│  AI 모드: 제안된 액션은 /allow 또는 /deny로 처리          │");
    } else {
        println!("│  오프라인 모드: 결정적 명령만 사용 ('help' 입력)          │");
    }
    println!("│  /rooms /state /degrade <system> /reload /quit           │");
    println!("└──────────────────────────────────────────────────────────┘");
    println!();
}

/// 아직 출력하지 않은 어시스턴트 메시지와 승인 대기 안내 출력
fn print_new_turns(session: &AssistantSession, printed: &mut usize) {
    for message in session.conversation().since(*printed) {
        if message.role != ChatRole::Assistant {
            continue;
        }
        println!("agent> {}", message.content);
        if let Some(annotation) = &message.action {
            println!("       ✓ {annotation}");
        }
    }
    *printed = session.conversation().len();

    if let Some(pending) = session.pending_action() {
        println!("       [승인 대기] {} (/allow 또는 /deny)", pending.description);
    }
}

fn print_rooms(host: &DashboardHost) {
    let rooms = host.visible_rooms();
    if rooms.is_empty() {
        println!("  (필터에 맞는 병실 없음)");
    }
    for room in rooms {
        let marker = match room.status {
            ReadinessStatus::Ready => "●",
            ReadinessStatus::Cleaning => "◐",
            ReadinessStatus::Blocked => "■",
            ReadinessStatus::Unknown => "?",
        };
        let eta = room
            .eta_minutes
            .map(|m| format!("{m} min"))
            .unwrap_or_else(|| "unknown".to_string());
        let confidence = room
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let low = if room.is_low_confidence() { " ⚠" } else { "" };
        println!(
            "  {marker} {:<8} {:<8} {:<9} {:>3}%  ETA {:<8} conf {:>4}{low} {}",
            room.room_id,
            room.unit,
            room.status.label(),
            room.readiness_score,
            eta,
            confidence,
            room.blockers.join(", ")
        );
    }
}

fn print_state(host: &DashboardHost, session: &AssistantSession) {
    let filters = host.filters();
    println!(
        "  filters: unit={} status={} blocked_only={} search={:?}",
        filters.unit, filters.status, filters.show_only_blocked, filters.search_query
    );
    println!("  tab: {}", host.active_tab().display_name());
    if let Some(room) = host.open_room() {
        let verify = if room.is_low_confidence() {
            ", 수동 확인 필요"
        } else {
            ""
        };
        println!(
            "  open room: {} ({}{verify})",
            room.room_id, room.why_prioritized
        );
    }
    for (kind, unit) in host.focus() {
        println!("  focus: {kind} → {unit}");
    }
    if let Some(snapshot) = host.snapshot() {
        let degraded = snapshot.degraded_systems();
        if !degraded.is_empty() {
            println!("  degraded: {}", degraded.join(", "));
        }
    }
    let session_state = match session.state() {
        SessionState::Idle => "idle",
        SessionState::WaitingForResponse => "waiting",
        SessionState::AwaitingApproval(_) => "awaiting approval",
    };
    println!(
        "  session: {session_state}, {} messages, AI {}",
        session.conversation().len(),
        if session.ai_enabled() { "on" } else { "off" }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "healthops_app={level},healthops_assistant={level},healthops_network={level},healthops_core={level}",
        level = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let (manager, config) = load_config(&args);
    config.validate().context("설정 검증 실패")?;

    let host = Arc::new(DashboardHost::new(
        demo_dashboard(),
        Arc::new(ConsoleToast::new()),
        config.notification.toast_duration(),
    ));

    let mut session = AssistantSession::new(host.clone())
        .with_context_source(host.clone())
        .with_config(config.assistant.clone());

    if config.ai.is_configured() {
        let client = RemoteChatClient::new(&config.ai).context("AI 클라이언트 생성 실패")?;
        info!(model = %config.ai.model, "AI 어시스턴트 활성화");
        session = session.with_client(Arc::new(client));
    } else {
        info!("API 키 없음, 결정적 명령 모드");
    }

    print_banner(session.ai_enabled());

    let mut printed = 0;
    session.start().await;
    print_new_turns(&session, &mut printed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        use std::io::Write;
        print!("you> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("입력 읽기 실패")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((input, ""));

        match command {
            "/quit" | "/exit" => break,
            "/allow" => {
                if let Err(e) = session.approve() {
                    println!("  {e}");
                }
            }
            "/deny" => {
                if let Err(e) = session.deny() {
                    println!("  {e}");
                }
            }
            "/rooms" => print_rooms(&host),
            "/state" => print_state(&host, &session),
            "/reload" => reload_config(manager.as_ref(), &mut session),
            "/degrade" if rest.is_empty() => println!("  사용법: /degrade <system>"),
            "/degrade" => {
                if host.degrade(rest, None) {
                    println!("  {rest}: stale");
                } else {
                    println!("  알 수 없는 시스템: {rest}");
                }
            }
            _ if command.starts_with('/') => println!("  알 수 없는 명령: {command}"),
            _ => {
                if let Err(e) = session.submit(input).await {
                    println!("  {e}");
                }
            }
        }

        print_new_turns(&session, &mut printed);
    }

    info!("Healthops Agent 종료");
    Ok(())
}
