use std::sync::Arc;

use tracing::info;

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::{AdminSessions, AppState};
use crate::intake::notify::{Notifier, SmtpSender};
use crate::intake::store::InterestStore;
use crate::intake::IntakeService;
use crate::routes::app_router;
use crate::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(InterestStore::open(&config.database.path)?);
    let notifier = match &config.mail {
        Some(settings) => Notifier::new(Arc::new(SmtpSender::from_settings(settings)?)),
        None => {
            info!("mail transport not configured; operator notifications disabled");
            Notifier::disabled()
        }
    };

    let service = Arc::new(IntakeService::new(store, notifier));
    let state = AppState {
        service,
        sessions: Arc::new(AdminSessions::default()),
        admin: config.admin.clone(),
    };

    let app = app_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(?config.environment, %addr, "interest intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
