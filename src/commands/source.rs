use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ApiClient, Endpoints};
use crate::error::{Result, WebtrackError};
use crate::report::{parse_report_file, parse_reports, Report};
use crate::session::SessionStore;

/// Where a command reads its report document from.
#[derive(Clone, Debug)]
pub struct SourceOptions {
    /// Local JSON document (`-` for stdin) instead of the remote endpoint.
    pub input: Option<PathBuf>,
    pub endpoints: Endpoints,
    pub timeout: Option<Duration>,
    pub session_path: PathBuf,
}

/// Load the report document.
///
/// Local files must parse. A remote fetch needs a logged-in session; once one
/// exists, fetch failures are logged and yield an empty document.
pub fn load_reports(options: &SourceOptions) -> Result<Vec<Report>> {
    if let Some(path) = &options.input {
        return read_input(path);
    }

    let state = SessionStore::new(&options.session_path).load()?;
    let Some(session) = state.session() else {
        return Err(WebtrackError::Auth(
            "Not logged in; run `webtrack login` first or pass --input".to_string(),
        ));
    };

    let client = ApiClient::new(options.endpoints.clone(), options.timeout);
    match client.fetch_reports(Some(session)) {
        Ok(reports) => Ok(reports),
        Err(err) => {
            tracing::error!(error = %err, "there was an error fetching the reports");
            Ok(Vec::new())
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<Report>> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return parse_reports(&buf);
    }
    let reports = parse_report_file(path)?;
    tracing::debug!(path = %path.display(), reports = reports.len(), "loaded report file");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::{load_reports, SourceOptions};
    use crate::client::test_server::serve;
    use crate::client::Endpoints;
    use crate::error::WebtrackError;
    use crate::session::{AuthState, Session, SessionStore};

    fn options(tmp: &TempDir, reports_url: String) -> SourceOptions {
        SourceOptions {
            input: None,
            endpoints: Endpoints {
                reports_url,
                ..Endpoints::default()
            },
            timeout: Some(Duration::from_secs(5)),
            session_path: tmp.path().join("session.json"),
        }
    }

    fn log_in(options: &SourceOptions) {
        let session = Session {
            username: "alice".to_string(),
            role: "ADMIN".to_string(),
            token: "t".to_string(),
        };
        SessionStore::new(&options.session_path)
            .save(&AuthState::default().login(session))
            .unwrap();
    }

    #[test]
    fn reads_local_documents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("reports.json");
        fs::write(&path, r#"[{"date": "01-01-2025", "systemName": "S"}]"#).unwrap();

        let mut opts = options(&tmp, "http://127.0.0.1:9/unused".to_string());
        opts.input = Some(path);
        assert_eq!(load_reports(&opts).unwrap().len(), 1);
    }

    #[test]
    fn remote_loads_require_a_session() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, "http://127.0.0.1:9/unused".to_string());
        let err = load_reports(&opts).unwrap_err();
        assert!(matches!(err, WebtrackError::Auth(_)));
    }

    #[test]
    fn failed_fetch_yields_an_empty_document() {
        let tmp = TempDir::new().unwrap();
        let (base, server) = serve(vec![(500, "{}".to_string())]);
        let opts = options(&tmp, format!("{base}/reports"));
        log_in(&opts);

        assert!(load_reports(&opts).unwrap().is_empty());
        server.join().unwrap();
    }

    #[test]
    fn fetches_with_the_stored_session() {
        let tmp = TempDir::new().unwrap();
        let (base, server) = serve(vec![(
            200,
            r#"[{"date": "01-01-2025", "systemName": "S", "users": []}]"#.to_string(),
        )]);
        let opts = options(&tmp, format!("{base}/reports"));
        log_in(&opts);

        assert_eq!(load_reports(&opts).unwrap().len(), 1);
        let requests = server.join().unwrap();
        assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer t"));
    }
}
