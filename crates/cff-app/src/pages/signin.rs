// Sign-in page: log in, sign up, sign out and session check.

use cff_core::api::{ApiError, AuthResponse, Credentials, TokenValidation};
use cff_core::session::{Session, SharedStorage};
use cff_core::widget::{RequestId, Widget};
use tracing::{debug, info};

use super::{non_blank, status_section, Effect, Page, PageContext, UNREACHABLE};
use crate::protocol::{AuthKind, PageId};
use crate::view::{KeyHint, PageView, Section, Tone};

pub const ACCOUNT_TITLE: &str = "Account";
pub const LOGIN_TITLE: &str = "Log in";
pub const SIGNUP_TITLE: &str = "Sign up";
pub const SESSION_TITLE: &str = "Session check";

const WORKING: &str = "Working...";
const CHECKING: &str = "Checking session...";
const MISSING_FIELDS: &str = "Email and password are required.";
const REQUEST_FAILED: &str = "Request failed";
const SESSION_EXPIRED: &str = "Session expired. Sign in again.";

const HINTS: [KeyHint; 2] = [KeyHint::new("l", "log in"), KeyHint::new("u", "sign up")];
const VALIDATE_HINT: KeyHint = KeyHint::new("v", "check session");

pub struct SignInPage {
    ctx: PageContext,
    login: Widget<String>,
    signup: Widget<String>,
    validation: Widget<String>,
}

impl SignInPage {
    pub fn new(shared: &SharedStorage) -> Self {
        SignInPage {
            ctx: PageContext::open(shared),
            login: Widget::new(),
            signup: Widget::new(),
            validation: Widget::new(),
        }
    }

    fn status(&mut self, kind: AuthKind) -> &mut Widget<String> {
        match kind {
            AuthKind::LogIn => &mut self.login,
            AuthKind::SignUp => &mut self.signup,
        }
    }

    /// Submit the log-in or sign-up form.
    pub fn submit(&mut self, kind: AuthKind, email: &str, password: &str) -> Option<Effect> {
        let email = email.trim();
        let status = self.status(kind);
        if email.is_empty() || password.is_empty() {
            status.set(Err(MISSING_FIELDS.to_string()));
            return None;
        }
        let request = status.begin();
        Some(Effect::Auth {
            kind,
            request,
            credentials: Credentials {
                email: email.to_string(),
                password: password.to_string(),
            },
        })
    }

    /// Apply an auth response. A successful log-in (not sign-up) moves on
    /// to the league page.
    pub fn on_auth(
        &mut self,
        kind: AuthKind,
        request: RequestId,
        email: &str,
        result: Result<AuthResponse, ApiError>,
    ) -> Vec<Effect> {
        if !self.status(kind).is_current(request) {
            debug!("ignoring superseded {:?} response", kind);
            return Vec::new();
        }

        match result {
            Ok(response) => {
                let label = non_blank(response.email.as_deref()).unwrap_or(email).to_string();
                let session = Session::new(Some(label), response.token);
                if !session.is_valid() {
                    self.status(kind).complete(request, Err(REQUEST_FAILED.to_string()));
                    return Vec::new();
                }
                info!("{:?} succeeded for {}", kind, session.display_label());
                self.ctx.save_session(session);
                let message = non_blank(response.message.as_deref())
                    .unwrap_or("Success")
                    .to_string();
                self.status(kind).complete(request, Ok(message));
                match kind {
                    AuthKind::LogIn => vec![Effect::Navigate(PageId::League)],
                    AuthKind::SignUp => Vec::new(),
                }
            }
            Err(e) => {
                let message = if e.is_unreachable() {
                    UNREACHABLE
                } else {
                    e.server_message().unwrap_or(REQUEST_FAILED)
                };
                self.status(kind).complete(request, Err(message.to_string()));
                Vec::new()
            }
        }
    }

    /// Ask the server whether the stored token is still accepted.
    pub fn validate(&mut self) -> Option<Effect> {
        match self.ctx.token().map(str::to_string) {
            Some(token) => Some(Effect::Validate {
                request: self.validation.begin(),
                token,
            }),
            None => {
                self.validation.set(Err("Not signed in yet.".to_string()));
                None
            }
        }
    }

    /// The stored session is kept either way; only sign-out removes it.
    pub fn on_validation(&mut self, request: RequestId, result: Result<TokenValidation, ApiError>) {
        let outcome = match result {
            Ok(TokenValidation { valid: true, email }) => {
                let fallback = self.ctx.session().map(|s| s.display_label().to_string());
                let who = non_blank(email.as_deref())
                    .map(str::to_string)
                    .or(fallback)
                    .unwrap_or_else(|| "Account".to_string());
                Ok(format!("Session is active for {who}."))
            }
            Ok(_) | Err(ApiError::Unauthorized { .. }) => Err(SESSION_EXPIRED.to_string()),
            Err(e) if e.is_unreachable() => Err(UNREACHABLE.to_string()),
            Err(e) => Err(e.server_message().unwrap_or(REQUEST_FAILED).to_string()),
        };
        self.validation.complete(request, outcome);
    }

    fn account_section(&self) -> Section {
        let note = match self.ctx.session() {
            Some(session) => match non_blank(session.email.as_deref()) {
                Some(email) => format!("Signed in as {email}."),
                None => "Signed in.".to_string(),
            },
            None => "Not signed in yet.".to_string(),
        };
        Section::message(ACCOUNT_TITLE, note, Tone::Normal)
    }
}

impl Page for SignInPage {
    fn id(&self) -> PageId {
        PageId::SignIn
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    /// Loading the sign-in page while already signed in goes straight to the
    /// league page.
    fn show(&mut self, first: bool) -> Vec<Effect> {
        if first && self.ctx.session().is_some() {
            info!("already signed in, redirecting to league page");
            vec![Effect::Navigate(PageId::League)]
        } else {
            Vec::new()
        }
    }

    fn sign_out(&mut self) {
        self.ctx.sign_out();
        self.login.set(Ok("Signed out".to_string()));
        self.validation.reset();
    }

    fn view(&self) -> PageView {
        let mut hints = HINTS.to_vec();
        if self.ctx.session().is_some() {
            hints.push(VALIDATE_HINT);
        }
        self.ctx.page_view(
            self.id(),
            vec![
                self.account_section(),
                status_section(LOGIN_TITLE, &self.login, WORKING),
                status_section(SIGNUP_TITLE, &self.signup, WORKING),
                status_section(SESSION_TITLE, &self.validation, CHECKING),
            ],
            hints,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_request(effect: Option<Effect>) -> RequestId {
        match effect {
            Some(Effect::Auth { request, .. }) => request,
            other => panic!("expected an auth effect, got {other:?}"),
        }
    }

    fn ok_response(email: Option<&str>, message: Option<&str>) -> AuthResponse {
        AuthResponse {
            email: email.map(str::to_string),
            token: "tok-1".into(),
            message: message.map(str::to_string),
        }
    }

    fn text(page: &SignInPage, title: &str) -> String {
        page.view().section(title).unwrap().text().unwrap().to_string()
    }

    #[test]
    fn missing_fields_do_not_call_server() {
        let mut page = SignInPage::new(&SharedStorage::in_memory());
        assert!(page.submit(AuthKind::LogIn, "  ", "pw").is_none());
        assert_eq!(text(&page, LOGIN_TITLE), MISSING_FIELDS);
        assert!(page.submit(AuthKind::SignUp, "a@b.c", "").is_none());
        assert_eq!(text(&page, SIGNUP_TITLE), MISSING_FIELDS);
    }

    #[test]
    fn login_success_persists_and_redirects() {
        let shared = SharedStorage::in_memory();
        let mut page = SignInPage::new(&shared);
        let request = auth_request(page.submit(AuthKind::LogIn, " coach@cff.test ", "pw"));
        assert_eq!(text(&page, LOGIN_TITLE), WORKING);

        let effects = page.on_auth(
            AuthKind::LogIn,
            request,
            "coach@cff.test",
            Ok(ok_response(None, Some("Signed in"))),
        );

        assert_eq!(effects, vec![Effect::Navigate(PageId::League)]);
        assert_eq!(text(&page, LOGIN_TITLE), "Signed in");
        assert_eq!(text(&page, ACCOUNT_TITLE), "Signed in as coach@cff.test.");
        let stored = shared.open_context().read_session().unwrap();
        assert_eq!(stored.email.as_deref(), Some("coach@cff.test"));
        assert_eq!(stored.token, "tok-1");
    }

    #[test]
    fn signup_success_stays_on_page() {
        let mut page = SignInPage::new(&SharedStorage::in_memory());
        let request = auth_request(page.submit(AuthKind::SignUp, "new@cff.test", "pw"));
        let effects = page.on_auth(
            AuthKind::SignUp,
            request,
            "new@cff.test",
            Ok(ok_response(Some("new@cff.test"), None)),
        );
        assert!(effects.is_empty());
        assert_eq!(text(&page, SIGNUP_TITLE), "Success");
        assert!(page.view().nav.signed_in);
    }

    #[test]
    fn blank_response_email_falls_back_to_typed_email() {
        let shared = SharedStorage::in_memory();
        let mut page = SignInPage::new(&shared);
        let request = auth_request(page.submit(AuthKind::SignUp, "typed@cff.test", "pw"));
        page.on_auth(
            AuthKind::SignUp,
            request,
            "typed@cff.test",
            Ok(ok_response(Some(""), None)),
        );

        assert_eq!(page.view().nav.label, "typed@cff.test");
        let stored = shared.open_context().read_session().unwrap();
        assert_eq!(stored.email.as_deref(), Some("typed@cff.test"));
    }

    #[test]
    fn rejection_shows_server_error_verbatim() {
        let mut page = SignInPage::new(&SharedStorage::in_memory());
        let request = auth_request(page.submit(AuthKind::LogIn, "a@b.c", "bad"));
        page.on_auth(
            AuthKind::LogIn,
            request,
            "a@b.c",
            Err(ApiError::Unauthorized {
                message: Some("Invalid credentials".into()),
            }),
        );
        assert_eq!(text(&page, LOGIN_TITLE), "Invalid credentials");
        assert!(!page.view().nav.signed_in);

        let request = auth_request(page.submit(AuthKind::LogIn, "a@b.c", "bad"));
        page.on_auth(
            AuthKind::LogIn,
            request,
            "a@b.c",
            Err(ApiError::Rejected {
                status: 500,
                message: None,
            }),
        );
        assert_eq!(text(&page, LOGIN_TITLE), REQUEST_FAILED);
    }

    #[test]
    fn transport_failure_asks_if_server_runs() {
        let mut page = SignInPage::new(&SharedStorage::in_memory());
        let request = auth_request(page.submit(AuthKind::SignUp, "a@b.c", "pw"));
        page.on_auth(
            AuthKind::SignUp,
            request,
            "a@b.c",
            Err(ApiError::Transport("connection refused".into())),
        );
        assert_eq!(text(&page, SIGNUP_TITLE), UNREACHABLE);
    }

    #[test]
    fn superseded_login_does_not_write_session() {
        let shared = SharedStorage::in_memory();
        let mut page = SignInPage::new(&shared);
        let first = auth_request(page.submit(AuthKind::LogIn, "a@b.c", "pw"));
        let _second = auth_request(page.submit(AuthKind::LogIn, "a@b.c", "pw2"));

        let effects = page.on_auth(AuthKind::LogIn, first, "a@b.c", Ok(ok_response(None, None)));

        assert!(effects.is_empty());
        assert!(shared.open_context().read_session().is_none());
        assert_eq!(text(&page, LOGIN_TITLE), WORKING);
    }

    #[test]
    fn first_show_redirects_when_signed_in() {
        let shared = SharedStorage::in_memory();
        shared
            .open_context()
            .write_session(&Session::new(None, "tok"))
            .unwrap();
        let mut page = SignInPage::new(&shared);
        assert_eq!(page.show(true), vec![Effect::Navigate(PageId::League)]);
        assert!(page.show(false).is_empty());

        let mut signed_out = SignInPage::new(&SharedStorage::in_memory());
        assert!(signed_out.show(true).is_empty());
    }

    #[test]
    fn sign_out_clears_and_reports() {
        let shared = SharedStorage::in_memory();
        let mut page = SignInPage::new(&shared);
        let request = auth_request(page.submit(AuthKind::SignUp, "a@b.c", "pw"));
        page.on_auth(AuthKind::SignUp, request, "a@b.c", Ok(ok_response(None, None)));

        page.sign_out();

        assert_eq!(text(&page, LOGIN_TITLE), "Signed out");
        assert_eq!(text(&page, ACCOUNT_TITLE), "Not signed in yet.");
        assert!(shared.open_context().read_session().is_none());
    }

    #[test]
    fn validation_reports_without_clearing() {
        let shared = SharedStorage::in_memory();
        shared
            .open_context()
            .write_session(&Session::new(Some("coach@cff.test".into()), "tok"))
            .unwrap();
        let mut page = SignInPage::new(&shared);

        let Some(Effect::Validate { request, token }) = page.validate() else {
            panic!("expected a validate effect");
        };
        assert_eq!(token, "tok");
        page.on_validation(
            request,
            Ok(TokenValidation {
                valid: true,
                email: None,
            }),
        );
        assert_eq!(text(&page, SESSION_TITLE), "Session is active for coach@cff.test.");

        let Some(Effect::Validate { request, .. }) = page.validate() else {
            panic!("expected a validate effect");
        };
        page.on_validation(request, Err(ApiError::Unauthorized { message: None }));
        assert_eq!(text(&page, SESSION_TITLE), SESSION_EXPIRED);
        assert!(shared.open_context().read_session().is_some());
    }

    #[test]
    fn validation_without_session_is_local() {
        let mut page = SignInPage::new(&SharedStorage::in_memory());
        assert!(page.validate().is_none());
        assert_eq!(text(&page, SESSION_TITLE), "Not signed in yet.");
    }
}
