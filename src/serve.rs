//! HTTP server for the interactive chart
//!
//! `reviewscope serve reviews.csv` → loads the catalog, opens the browser,
//! and drives the chart. The page is a thin executor: every click or pointer
//! movement is posted back here and answered with drawing commands.

use crate::catalog::{self, LoadReport, RowPolicy};
use crate::chart::Command;
use crate::config::ChartConfig;
use crate::error::{Error, RowError};
use crate::navigation::{self, Event, Navigator, ViewState};
use crate::report::Summary;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(message: String) -> Self {
        Self { ok: false, data: None, error: Some(message) }
    }
}

/// Viewport of the overview chart, as measured by the page
#[derive(Deserialize, Debug, Default)]
pub struct OverviewParams {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Serialize, Debug)]
pub struct Overview {
    pub summary: Summary,
    pub skipped: Vec<RowError>,
    pub config: ChartConfig,
    pub commands: Vec<Command>,
}

#[derive(Serialize, Debug)]
pub struct EventReply {
    pub view: ViewState,
    pub commands: Vec<Command>,
}

/// A finished response, independent of the HTTP library
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &ApiResponse<T>) -> Self {
        let body = serde_json::to_string(value)
            .unwrap_or_else(|e| format!(r#"{{"ok":false,"data":null,"error":"{}"}}"#, e));
        Self { status, content_type: "application/json", body }
    }

    fn status_for(err: &Error) -> u16 {
        match err {
            Error::Load { .. }
            | Error::NoHeader
            | Error::MissingColumn(_)
            | Error::Parse(_)
            | Error::EmptyResult { .. } => 500,
            _ => 400,
        }
    }

    fn error(err: &Error) -> Self {
        Self::json::<()>(Self::status_for(err), &ApiResponse::failure(err.to_string()))
    }
}

/// One viewer's chart session over a loaded catalog
///
/// Holds the load failure instead of the catalog when loading failed, so
/// the page can show the message in place of the chart.
pub struct Session<'a> {
    catalog: Result<&'a LoadReport, &'a Error>,
    config: ChartConfig,
    navigator: Option<Navigator<'a>>,
}

impl<'a> Session<'a> {
    pub fn new(catalog: Result<&'a LoadReport, &'a Error>, config: ChartConfig) -> Self {
        Self { catalog, config, navigator: None }
    }

    /// Start over with a fresh overview sized to the viewport
    pub fn overview(&mut self, params: &OverviewParams) -> crate::Result<Overview> {
        let report = self.catalog.map_err(clone_load_error)?;

        let mut config = self.config.clone();
        if let Some(w) = params.width.filter(|w| *w > 0.0) {
            config.overview_width = w;
        }
        if let Some(h) = params.height.filter(|h| *h > 0.0) {
            config.overview_height = h;
        }

        let mut navigator = Navigator::new(&report.groups, config.clone())?;
        let commands = navigator.start();
        self.navigator = Some(navigator);

        Ok(Overview {
            summary: Summary::from_report(report),
            skipped: report.skipped.clone(),
            config,
            commands,
        })
    }

    pub fn event(&mut self, event: Event) -> crate::Result<EventReply> {
        let navigator = self
            .navigator
            .as_mut()
            .ok_or_else(|| Error::InvalidState("overview not loaded yet".to_string()))?;
        let commands = navigator.handle(event)?;
        Ok(EventReply { view: navigator.view(), commands })
    }

    fn route(&mut self, method: &Method, url: &str, body: &str) -> Reply {
        let mut parts = url.splitn(2, '?');
        let path = parts.next().unwrap_or("/");
        let query = parts.next().unwrap_or("");

        match (method, path) {
            (Method::Get, "/") => Reply { status: 200, content_type: "text/html; charset=utf-8", body: UI_HTML.to_string() },

            (Method::Get, "/api/overview") => {
                let params = match serde_urlencoded::from_str::<OverviewParams>(query) {
                    Ok(p) => p,
                    Err(e) => return Reply::json::<()>(400, &ApiResponse::failure(e.to_string())),
                };
                match self.overview(&params) {
                    Ok(overview) => Reply::json(200, &ApiResponse::success(overview)),
                    Err(e) => {
                        warn!(error = %e, "overview unavailable");
                        self.navigator = None;
                        let response = ApiResponse {
                            ok: false,
                            data: Some(navigation::unavailable(&e)),
                            error: Some(e.to_string()),
                        };
                        Reply::json(Reply::status_for(&e), &response)
                    }
                }
            }

            (Method::Post, "/api/event") => {
                let event = match serde_json::from_str::<Event>(body) {
                    Ok(e) => e,
                    Err(e) => return Reply::json::<()>(400, &ApiResponse::failure(e.to_string())),
                };
                debug!(?event, "event");
                match self.event(event) {
                    Ok(reply) => Reply::json(200, &ApiResponse::success(reply)),
                    Err(e) => {
                        warn!(error = %e, "event rejected");
                        Reply::error(&e)
                    }
                }
            }

            _ => Reply { status: 404, content_type: "text/plain", body: "Not found".to_string() },
        }
    }
}

/// `Error` holds an `io::Error`, so the stored load failure is rebuilt per request
fn clone_load_error(err: &Error) -> Error {
    match err {
        Error::Load { path, source } => Error::Load {
            path: path.clone(),
            source: std::io::Error::new(source.kind(), source.to_string()),
        },
        Error::NoHeader => Error::NoHeader,
        Error::MissingColumn(c) => Error::MissingColumn(*c),
        Error::Parse(row) => Error::Parse(row.clone()),
        Error::EmptyResult { min_albums } => Error::EmptyResult { min_albums: *min_albums },
        other => Error::InvalidState(other.to_string()),
    }
}

/// Start server, open browser, serve UI
pub fn start(
    port: u16,
    path: PathBuf,
    config: ChartConfig,
    policy: RowPolicy,
    open_browser: bool,
) -> std::io::Result<()> {
    let loaded = catalog::load(&path, policy);
    match &loaded {
        Ok(report) => info!(
            artists = report.groups.len(),
            skipped = report.skipped.len(),
            "catalog loaded"
        ),
        Err(e) => warn!(error = %e, "catalog failed to load; the page will show the error"),
    }
    let mut session = Session::new(loaded.as_ref(), config);

    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32m♪ Reviewscope\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Catalog: {}\n", path.display());

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&mut session, request) {
            warn!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(session: &mut Session<'_>, mut request: Request) -> std::io::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();

    let mut body = String::new();
    if method == Method::Post {
        request.as_reader().read_to_string(&mut body)?;
    }

    let reply = session.route(&method, &url, &body);
    debug!(%method, %url, status = reply.status, "request");

    let mut response = Response::from_string(reply.body).with_status_code(tiny_http::StatusCode(reply.status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    request.respond(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ElementId;
    use crate::report::tests::sample_report;

    fn body(reply: &Reply) -> serde_json::Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    // ==========================================================================
    // ROUTING TESTS
    // ==========================================================================
    //
    // Routes are exercised without a socket: `route` takes the method, URL
    // and body and returns the finished reply.
    // ==========================================================================

    #[test]
    fn test_index_serves_ui() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        let reply = session.route(&Method::Get, "/", "");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("/api/overview"));
    }

    #[test]
    fn test_unknown_route() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        assert_eq!(session.route(&Method::Get, "/nope", "").status, 404);
    }

    #[test]
    fn test_overview_uses_viewport() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        let reply = session.route(&Method::Get, "/api/overview?width=600&height=400", "");
        let v = body(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(v["ok"], true);
        assert_eq!(v["data"]["summary"]["artists"], 2);
        assert_eq!(v["data"]["skipped"][0]["line"], 9);

        let commands = v["data"]["commands"].as_array().unwrap();
        let x_axis = commands
            .iter()
            .find(|c| c["op"] == "axis" && c["orient"] == "bottom")
            .unwrap();
        // Bottom axis sits one margin above the requested height
        assert_eq!(x_axis["offset"], 380.0);
    }

    #[test]
    fn test_event_before_overview_is_rejected() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        let reply = session.route(&Method::Post, "/api/event", r#"{"type":"select","artist":0}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(body(&reply)["ok"], false);
    }

    #[test]
    fn test_select_then_focus() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        session.route(&Method::Get, "/api/overview", "");

        let reply = session.route(&Method::Post, "/api/event", r#"{"type":"select","artist":1}"#);
        let v = body(&reply);
        assert_eq!(v["data"]["view"]["view"], "detail");
        assert_eq!(v["data"]["view"]["group"], 1);

        let reply = session.route(&Method::Post, "/api/event", r#"{"type":"focus","review":2}"#);
        let v = body(&reply);
        let panel = v["data"]["commands"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["op"] == "panel")
            .cloned()
            .unwrap();
        assert_eq!(panel["subheading"], "Beta");
        assert_eq!(panel["lines"][0], "Reviewed on July 19, 2016");
    }

    #[test]
    fn test_pointer_event_round_trip() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        session.overview(&OverviewParams::default()).unwrap();

        let event = serde_json::json!({
            "type": "pointer",
            "kind": "enter",
            "element": { "kind": "bar", "index": 0 },
            "x": 10.0,
            "y": 20.0
        });
        let reply = session.route(&Method::Post, "/api/event", &event.to_string());
        let v = body(&reply);
        let commands = v["data"]["commands"].as_array().unwrap();
        assert!(commands.iter().any(|c| c["op"] == "move_tooltip" && c["text"] == "Average Score: 4.0/10"));
        assert_eq!(session.navigator.as_ref().unwrap().hovered(), Some(ElementId::Bar { index: 0 }));
    }

    #[test]
    fn test_bad_event_json() {
        let report = sample_report();
        let mut session = Session::new(Ok(&report), ChartConfig::default());
        session.overview(&OverviewParams::default()).unwrap();
        let reply = session.route(&Method::Post, "/api/event", "{not json");
        assert_eq!(reply.status, 400);
        assert!(body(&reply)["error"].is_string());
    }

    #[test]
    fn test_load_failure_reported_to_page() {
        let err = catalog::load("/definitely/not/here.csv", RowPolicy::Skip).unwrap_err();
        let mut session = Session::new(Err(&err), ChartConfig::default());
        let reply = session.route(&Method::Get, "/api/overview", "");
        let v = body(&reply);
        assert_eq!(reply.status, 500);
        assert_eq!(v["ok"], false);
        assert!(v["error"].as_str().unwrap().contains("here.csv"));

        // The page draws the reason where the chart would be
        let message = v["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["op"] == "message")
            .cloned()
            .unwrap();
        assert_eq!(message["text"], v["error"]);
    }
}
