//! Network transport: connection settings and the `ureq` agent built from them.
//!
//! # Design
//! A `Transport` is plain settings until its first use, when the agent is
//! built and cached. That leaves a window in which the transport-creation hook
//! can adjust any field. When a dial hook is set, it runs in front of the
//! default connector for every new connection, so it sees each dial attempt
//! and may refuse it.

use std::fmt;
use std::fs;
use std::io;
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use ureq::http::{Request, Response};
use ureq::tls::{parse_pem, ClientCert, PemItem, TlsConfig};
use ureq::unversioned::resolver::DefaultResolver;
use socket2::{Domain, Protocol, Socket, TcpKeepalive, Type};
use ureq::unversioned::transport::{
    ConnectionDetails, Connector, DefaultConnector, LazyBuffers, TcpTransport,
};
use ureq::{Agent, Body};

use crate::error::TlsError;

/// Keep-alive interval applied to transports built for keep-alive requests.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Called with `host:port` before every connection attempt. An `Err` aborts
/// the dial.
pub type DialHook = Arc<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

/// Connection settings for outbound requests.
pub struct Transport {
    /// Keep idle connections for reuse. When false every request dials.
    pub keep_alive: bool,
    /// Idle time before TCP keep-alive kicks in on every dialed socket.
    pub keep_alive_interval: Option<Duration>,
    pub dial_timeout: Option<Duration>,
    /// Client certificate presented during the TLS handshake.
    pub client_cert: Option<ClientCert>,
    pub user_agent: Option<String>,
    pub dial_hook: Option<DialHook>,
    agent: OnceLock<Agent>,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            keep_alive: true,
            keep_alive_interval: None,
            dial_timeout: None,
            client_cert: None,
            user_agent: None,
            dial_hook: None,
            agent: OnceLock::new(),
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("keep_alive", &self.keep_alive)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("dial_timeout", &self.dial_timeout)
            .field("client_cert", &self.client_cert.is_some())
            .field("user_agent", &self.user_agent)
            .field("dial_hook", &self.dial_hook.is_some())
            .field("built", &self.agent.get().is_some())
            .finish()
    }
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = Some(interval);
        self
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = Some(timeout);
        self
    }

    pub fn with_client_cert(mut self, cert: ClientCert) -> Self {
        self.client_cert = Some(cert);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_dial_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> io::Result<()> + Send + Sync + 'static,
    {
        self.dial_hook = Some(Arc::new(hook));
        self
    }

    /// The agent for these settings, built on first call.
    pub fn agent(&self) -> &Agent {
        self.agent.get_or_init(|| self.build_agent())
    }

    fn build_agent(&self) -> Agent {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(self.dial_timeout);
        if !self.keep_alive {
            config = config.max_idle_connections(0).max_idle_connections_per_host(0);
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent.as_str());
        }
        if let Some(cert) = &self.client_cert {
            let tls = TlsConfig::builder().client_cert(Some(cert.clone())).build();
            config = config.tls_config(tls);
        }
        let config = config.build();

        let notifier = self.dial_hook.as_ref().map(|hook| DialNotifier { hook: Arc::clone(hook) });
        let keepalive = self.keep_alive_interval.map(|interval| KeepAliveDialer {
            interval,
            connect_timeout: self.dial_timeout,
        });
        let resolver = DefaultResolver::default();
        match (notifier, keepalive) {
            (None, None) => Agent::new_with_config(config),
            (Some(notifier), None) => Agent::with_parts(config, notifier.chain(DefaultConnector::new()), resolver),
            (None, Some(dialer)) => Agent::with_parts(config, dialer.chain(DefaultConnector::new()), resolver),
            (Some(notifier), Some(dialer)) => Agent::with_parts(
                config,
                notifier.chain(dialer).chain(DefaultConnector::new()),
                resolver,
            ),
        }
    }
}

/// Agent shared by every request that needs nothing beyond the defaults.
pub(crate) fn default_agent() -> &'static Agent {
    static DEFAULT: OnceLock<Agent> = OnceLock::new();
    DEFAULT.get_or_init(|| Agent::config_builder().http_status_as_error(false).build().new_agent())
}

/// Send `request` through `agent`, bounding the whole exchange by `timeout`.
pub(crate) fn run(
    agent: &Agent,
    request: Request<Vec<u8>>,
    timeout: Option<Duration>,
) -> Result<Response<Body>, ureq::Error> {
    let (parts, body) = request.into_parts();
    if body.is_empty() {
        let request = agent
            .configure_request(Request::from_parts(parts, ()))
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        agent.run(request)
    } else {
        let request = agent
            .configure_request(Request::from_parts(parts, body))
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        agent.run(request)
    }
}

/// Load a PEM certificate chain and private key.
pub fn load_client_cert(cert_path: &Path, key_path: &Path) -> Result<ClientCert, TlsError> {
    let cert_pem = read_pem(cert_path)?;
    let key_pem = read_pem(key_path)?;

    let mut chain = Vec::new();
    for item in parse_pem(&cert_pem) {
        if let PemItem::Certificate(cert) = item.map_err(|e| pem_error(cert_path, e))? {
            chain.push(cert);
        }
    }
    if chain.is_empty() {
        return Err(TlsError::MissingCertificate(cert_path.to_path_buf()));
    }

    let mut key = None;
    for item in parse_pem(&key_pem) {
        if let PemItem::PrivateKey(found) = item.map_err(|e| pem_error(key_path, e))? {
            key = Some(found);
            break;
        }
    }
    let key = key.ok_or_else(|| TlsError::MissingPrivateKey(key_path.to_path_buf()))?;

    Ok(ClientCert::new_with_certs(&chain, key))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TlsError> {
    fs::read(path).map_err(|source| TlsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn pem_error(path: &Path, source: ureq::Error) -> TlsError {
    TlsError::Pem {
        path: PathBuf::from(path),
        source: Box::new(source),
    }
}

/// Connector placed ahead of the default chain to report each dial.
struct DialNotifier {
    hook: DialHook,
}

impl fmt::Debug for DialNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DialNotifier")
    }
}

impl Connector<()> for DialNotifier {
    type Out = ();

    fn connect(&self, details: &ConnectionDetails, chained: Option<()>) -> Result<Option<()>, ureq::Error> {
        let uri = &details.uri;
        let default_port = if uri.scheme_str() == Some("https") { 443 } else { 80 };
        let address = format!(
            "{}:{}",
            uri.host().unwrap_or_default(),
            uri.port_u16().unwrap_or(default_port)
        );
        (self.hook)(&address).map_err(ureq::Error::Io)?;
        Ok(chained)
    }
}

/// Dials plain TCP with TCP keep-alive enabled on the socket.
#[derive(Debug)]
struct KeepAliveDialer {
    interval: Duration,
    connect_timeout: Option<Duration>,
}

impl Connector<()> for KeepAliveDialer {
    type Out = TcpTransport;

    fn connect(&self, details: &ConnectionDetails, _chained: Option<()>) -> Result<Option<TcpTransport>, ureq::Error> {
        let mut last_error = None;
        for addr in details.addrs.iter() {
            match dial_with_keepalive(*addr, self.interval, self.connect_timeout) {
                Ok(stream) => {
                    let buffers = LazyBuffers::new(
                        details.config.input_buffer_size(),
                        details.config.output_buffer_size(),
                    );
                    return Ok(Some(TcpTransport::new(stream, buffers)));
                }
                Err(err) => last_error = Some(err),
            }
        }
        Err(ureq::Error::Io(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no address to dial")
        })))
    }
}

/// Connect to `addr` with `SO_KEEPALIVE` on and an idle time of `interval`.
pub(crate) fn dial_with_keepalive(
    addr: SocketAddr,
    interval: Duration,
    connect_timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_tcp_keepalive(&TcpKeepalive::new().with_time(interval))?;
    match connect_timeout {
        Some(timeout) => socket.connect_timeout(&addr.into(), timeout)?,
        None => socket.connect(&addr.into())?,
    }
    let stream: TcpStream = socket.into();
    stream.set_nodelay(true)?;
    Ok(stream)
}
