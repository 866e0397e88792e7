use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::review::ReviewInfo;
use crate::domain::ticket::{
    REVIEW_COMPONENT, REVIEW_OP_SYS, REVIEW_PLATFORM, REVIEW_PRIORITY, REVIEW_PRODUCT,
    REVIEW_SEVERITY, REVIEW_VERSION, Ticket,
};
use crate::error::{AppError, AppResult};
use crate::services::ReviewTracker;

const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";

pub struct BugzillaClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BugzillaClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn bug_endpoint(&self) -> String {
        format!("{}/rest/bug", self.base())
    }

    fn bug_detail_endpoint(&self, id: u64) -> String {
        format!("{}/rest/bug/{id}", self.base())
    }

    fn comment_endpoint(&self, id: u64) -> String {
        format!("{}/rest/bug/{id}/comment", self.base())
    }

    fn show_url(&self, id: u64) -> String {
        format!("{}/show_bug.cgi?id={id}", self.base())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> AppResult<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Bugzilla: {err}")))?;
        Self::decode(response, action).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> AppResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());

        if !status.is_success() {
            let detail = serde_json::from_str::<BugzillaError>(&body)
                .ok()
                .and_then(|err| err.message)
                .unwrap_or(body);
            return Err(AppError::IssueTracker(format!(
                "Bugzilla responded with {status} while trying to {action}: {detail}"
            )));
        }

        serde_json::from_str(&body).map_err(|err| {
            AppError::IssueTracker(format!(
                "failed to parse Bugzilla response while trying to {action}: {err}"
            ))
        })
    }

    async fn fetch_ticket(&self, id: u64) -> AppResult<Ticket> {
        let payload: BugzillaBugList = self
            .send(self.http.get(self.bug_detail_endpoint(id)), "refresh the bug")
            .await?;
        let bug = payload
            .bugs
            .into_iter()
            .find(|bug| bug.id == id)
            .ok_or_else(|| AppError::IssueTracker(format!("bug {id} not found after creation")))?;

        Ok(Ticket {
            id,
            url: self.show_url(id),
            summary: bug.summary,
            status: bug.status,
        })
    }
}

#[async_trait]
impl ReviewTracker for BugzillaClient {
    async fn create_review(&self, info: &ReviewInfo) -> AppResult<Ticket> {
        info!("Creating review");
        let request_body = BugzillaCreateBugRequest::review(info);
        debug!(request = ?request_body, "bz.createbug");

        let created: BugzillaCreateBugResponse = self
            .send(
                self.http
                    .post(self.bug_endpoint())
                    .header(CONTENT_TYPE, "application/json")
                    .json(&request_body),
                "create the bug",
            )
            .await?;

        self.fetch_ticket(created.id).await
    }

    async fn add_comment(&self, ticket: &Ticket, body: &str) -> AppResult<()> {
        let _: serde_json::Value = self
            .send(
                self.http
                    .post(self.comment_endpoint(ticket.id))
                    .header(CONTENT_TYPE, "application/json")
                    .json(&BugzillaCommentRequest { comment: body }),
                "add a comment",
            )
            .await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct BugzillaCreateBugRequest {
    product: &'static str,
    component: &'static str,
    version: &'static str,
    summary: String,
    description: String,
    platform: &'static str,
    op_sys: &'static str,
    severity: &'static str,
    priority: &'static str,
    url: &'static str,
}

impl BugzillaCreateBugRequest {
    fn review(info: &ReviewInfo) -> Self {
        Self {
            product: REVIEW_PRODUCT,
            component: REVIEW_COMPONENT,
            version: REVIEW_VERSION,
            summary: info.ticket_summary(),
            description: info.ticket_description(),
            platform: REVIEW_PLATFORM,
            op_sys: REVIEW_OP_SYS,
            severity: REVIEW_SEVERITY,
            priority: REVIEW_PRIORITY,
            url: "",
        }
    }
}

#[derive(Deserialize)]
struct BugzillaCreateBugResponse {
    id: u64,
}

#[derive(Deserialize)]
struct BugzillaBugList {
    bugs: Vec<BugzillaBug>,
}

#[derive(Deserialize)]
struct BugzillaBug {
    id: u64,
    summary: String,
    status: Option<String>,
}

#[derive(Serialize)]
struct BugzillaCommentRequest<'a> {
    comment: &'a str,
}

#[derive(Deserialize)]
struct BugzillaError {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn review_info() -> ReviewInfo {
        ReviewInfo {
            name: "foo".to_string(),
            summary: "Foo library".to_string(),
            description: "A foo library.".to_string(),
            spec_url: "http://jdoe.fedorapeople.org/foo.spec".to_string(),
            srpm_url: "http://jdoe.fedorapeople.org/foo-1.0-1.src.rpm".to_string(),
        }
    }

    #[test]
    fn serializes_review_template() {
        let body = serde_json::to_value(BugzillaCreateBugRequest::review(&review_info())).unwrap();

        assert_eq!(
            body,
            json!({
                "product": "Fedora",
                "component": "Package Review",
                "version": "rawhide",
                "summary": "Review Request: foo - Foo library",
                "description": "Spec URL: http://jdoe.fedorapeople.org/foo.spec\nSRPM URL: http://jdoe.fedorapeople.org/foo-1.0-1.src.rpm\n\nDescription:\nA foo library.\n",
                "platform": "Unspecified",
                "op_sys": "Unspecified",
                "severity": "unspecified",
                "priority": "unspecified",
                "url": "",
            })
        );
    }

    #[test]
    fn builds_endpoints_without_double_slash() {
        let client = BugzillaClient::new("https://bugzilla.redhat.com/", None);

        assert_eq!(client.bug_endpoint(), "https://bugzilla.redhat.com/rest/bug");
        assert_eq!(
            client.comment_endpoint(42),
            "https://bugzilla.redhat.com/rest/bug/42/comment"
        );
        assert_eq!(
            client.show_url(42),
            "https://bugzilla.redhat.com/show_bug.cgi?id=42"
        );
    }

    #[test]
    fn parses_bug_list() {
        let payload: BugzillaBugList = serde_json::from_value(json!({
            "bugs": [{ "id": 42, "summary": "Review Request: foo - Foo library", "status": "NEW" }],
            "faults": []
        }))
        .unwrap();

        assert_eq!(payload.bugs[0].id, 42);
        assert_eq!(payload.bugs[0].status.as_deref(), Some("NEW"));
    }

    #[test]
    fn parses_error_message() {
        let err: BugzillaError = serde_json::from_value(json!({
            "error": true,
            "code": 410,
            "message": "You must log in before using this part of Bugzilla."
        }))
        .unwrap();

        assert_eq!(
            err.message.as_deref(),
            Some("You must log in before using this part of Bugzilla.")
        );
    }

    fn request_log(requests: &[wiremock::Request]) -> Vec<(String, String)> {
        requests
            .iter()
            .map(|request| (request.method.to_string(), request.url.path().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn creates_bug_then_refreshes_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/bug"))
            .and(header(API_KEY_HEADER, "secret"))
            .and(body_partial_json(json!({
                "product": "Fedora",
                "component": "Package Review",
                "summary": "Review Request: foo - Foo library",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/bug/42"))
            .and(header(API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bugs": [{ "id": 42, "summary": "Review Request: foo - Foo library", "status": "NEW" }],
                "faults": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BugzillaClient::new(server.uri(), Some("secret".to_string()));
        let ticket = client.create_review(&review_info()).await.unwrap();

        assert_eq!(
            ticket,
            Ticket {
                id: 42,
                url: format!("{}/show_bug.cgi?id=42", server.uri()),
                summary: "Review Request: foo - Foo library".to_string(),
                status: Some("NEW".to_string()),
            }
        );
        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            request_log(&requests),
            vec![
                ("POST".to_string(), "/rest/bug".to_string()),
                ("GET".to_string(), "/rest/bug/42".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn omits_api_key_header_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/bug"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/bug/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bugs": [{ "id": 7, "summary": "Review Request: foo - Foo library" }]
            })))
            .mount(&server)
            .await;

        let client = BugzillaClient::new(server.uri(), None);
        let ticket = client.create_review(&review_info()).await.unwrap();

        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.status, None);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(
            requests
                .iter()
                .all(|request| request.headers.get(API_KEY_HEADER).is_none())
        );
    }

    #[tokio::test]
    async fn surfaces_bugzilla_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/bug"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": true,
                "code": 410,
                "message": "You must log in before using this part of Bugzilla."
            })))
            .mount(&server)
            .await;

        let client = BugzillaClient::new(server.uri(), Some("stale".to_string()));
        let err = client.create_review(&review_info()).await.unwrap_err();

        match err {
            AppError::IssueTracker(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("You must log in before using this part of Bugzilla."));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn posts_comment_to_bug() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/bug/42/comment"))
            .and(header(API_KEY_HEADER, "secret"))
            .and(body_json(json!({
                "comment": "This package built on koji: http://koji/456"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9001 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BugzillaClient::new(format!("{}/", server.uri()), Some("secret".to_string()));
        let ticket = Ticket {
            id: 42,
            url: client.show_url(42),
            summary: "Review Request: foo - Foo library".to_string(),
            status: Some("NEW".to_string()),
        };

        client
            .add_comment(&ticket, "This package built on koji: http://koji/456")
            .await
            .unwrap();
    }
}
