//! Scripted collaborators shared by the handshake tests.
#![allow(dead_code)]

use appauth_api::AuthApi;
use appauth_cache::UserCache;
use appauth_platform::{PlatformGateway, ServiceHandle};
use appauth_types::{
    AppConfig, AppData, AppTokens, CollaboratorError, HelloResponse, JwtValidation,
    SymphonyToken, UserId, UserInfo,
};
use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Ordered record of every collaborator call, with its arguments.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.split('(').next().unwrap_or_default().to_string())
            .collect()
    }
}

/// Values the scripted collaborators hand out, and the call that should fail.
#[derive(Clone)]
pub struct Script {
    pub app_token: String,
    pub token_s: String,
    pub jwt: String,
    pub user_id: String,
    pub fail_at: Option<&'static str>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            app_token: "A1".to_string(),
            token_s: "S1".to_string(),
            jwt: "J1".to_string(),
            user_id: "U1".to_string(),
            fail_at: None,
        }
    }
}

impl Script {
    pub fn failing_at(step: &'static str) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    fn check(&self, step: &str) -> Result<(), CollaboratorError> {
        if self.fail_at == Some(step) {
            Err(CollaboratorError::Rejected {
                status: 401,
                body: format!("{step} refused"),
            })
        } else {
            Ok(())
        }
    }
}

pub struct FakePlatform {
    pub log: CallLog,
    pub script: Script,
}

#[async_trait]
impl PlatformGateway for FakePlatform {
    fn register_service(&self, name: &str) {
        self.log.push(format!("register_service({name})"));
    }

    fn subscribe(&self, name: &str) -> Result<Box<dyn ServiceHandle>, CollaboratorError> {
        self.log.push(format!("subscribe({name})"));
        self.script.check("subscribe")?;
        Ok(Box::new(FakeJwtService {
            log: self.log.clone(),
            script: self.script.clone(),
        }))
    }

    async fn hello(&self) -> Result<HelloResponse, CollaboratorError> {
        self.log.push("hello()");
        self.script.check("hello")?;
        Ok(HelloResponse(serde_json::json!({ "version": "1.0" })))
    }
}

struct FakeJwtService {
    log: CallLog,
    script: Script,
}

#[async_trait]
impl ServiceHandle for FakeJwtService {
    async fn get_jwt(&self) -> Result<String, CollaboratorError> {
        self.log.push("get_jwt()");
        self.script.check("get_jwt")?;
        Ok(self.script.jwt.clone())
    }
}

pub struct FakeAuth {
    pub log: CallLog,
    pub script: Script,
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn authenticate_app(&self, app_id: &str) -> Result<AppTokens, CollaboratorError> {
        self.log.push(format!("authenticate_app({app_id})"));
        self.script.check("authenticate_app")?;
        Ok(AppTokens {
            app_id: Some(app_id.to_string()),
            app_token: self.script.app_token.clone(),
        })
    }

    async fn register_application(
        &self,
        config: &AppConfig,
        app_data: &AppData,
    ) -> Result<SymphonyToken, CollaboratorError> {
        self.log.push(format!(
            "register_application({},{},{})",
            config.app_id, app_data.app_id, app_data.token_a
        ));
        self.script.check("register_application")?;
        Ok(SymphonyToken {
            token_s: self.script.token_s.clone(),
        })
    }

    async fn validate_tokens(
        &self,
        token_a: &str,
        token_s: &str,
        app_id: &str,
    ) -> Result<serde_json::Value, CollaboratorError> {
        self.log
            .push(format!("validate_tokens({token_a},{token_s},{app_id})"));
        self.script.check("validate_tokens")?;
        Ok(serde_json::Value::Null)
    }

    async fn validate_jwt(&self, jwt: &str) -> Result<JwtValidation, CollaboratorError> {
        self.log.push(format!("validate_jwt({jwt})"));
        self.script.check("validate_jwt")?;
        Ok(JwtValidation {
            user_id: UserId::new(self.script.user_id.clone()),
        })
    }
}

pub struct FakeCache {
    pub log: CallLog,
    pub script: Script,
    pub stored: Mutex<Vec<UserInfo>>,
}

impl UserCache for FakeCache {
    fn cache_user_info(&self, info: &UserInfo) -> Result<(), CollaboratorError> {
        self.log
            .push(format!("cache_user_info({},{})", info.jwt, info.user_id));
        self.script.check("cache_user_info")?;
        self.stored.lock().unwrap().push(info.clone());
        Ok(())
    }
}

pub struct Harness {
    pub log: CallLog,
    pub cache: Arc<FakeCache>,
    pub bootstrapper: appauth_bootstrap::Bootstrapper,
}

pub fn harness(script: Script) -> Harness {
    let log = CallLog::default();
    let cache = Arc::new(FakeCache {
        log: log.clone(),
        script: script.clone(),
        stored: Mutex::new(Vec::new()),
    });
    let bootstrapper = appauth_bootstrap::Bootstrapper::new(
        Arc::new(FakePlatform {
            log: log.clone(),
            script: script.clone(),
        }),
        Arc::new(FakeAuth {
            log: log.clone(),
            script,
        }),
        cache.clone(),
    );
    Harness {
        log,
        cache,
        bootstrapper,
    }
}

/// In-memory sink for formatted log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Installs a thread-local subscriber writing into the returned buffer.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
