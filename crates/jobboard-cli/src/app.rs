use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error, info, warn};

use jobboard_core::auth::secret::SESSION_SECRET_ENV;
use jobboard_core::auth::{SecretStore, SessionSigner, SessionStore, StoredSession};
use jobboard_core::models::{CompanyRegistration, NewOffer, ProfileUpdate, UserProfile};
use jobboard_core::utils::{format_bytes, progress_bar, truncate_string};
use jobboard_core::validation::{validate_company_registration, validate_login, validate_new_offer};
use jobboard_core::{
    ApiClient, Authenticator, Config, Credentials, OfferFilter, ProfileService, Session, UploadTracker,
    VideoFile,
};

/// Width of the terminal progress bar, in cells
const PROGRESS_WIDTH: usize = 30;

/// Column width for offer titles in listings
const TITLE_WIDTH: usize = 40;

pub struct App {
    config: Config,
    sessions: Option<SessionStore>,
    stored: Option<StoredSession>,
    api: ApiClient,
    authenticator: Authenticator,
    profiles: ProfileService,
}

impl App {
    pub fn new(api_url: Option<String>) -> Result<Self> {
        let mut config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        if let Some(url) = api_url {
            config.api_base_url = url;
        }
        debug!(base_url = %config.base_url(), "Config loaded");

        let sessions = open_sessions(&config);
        Self::with_sessions(config, sessions)
    }

    /// Build the app around an already opened session store. Without one,
    /// commands that need no session still work.
    fn with_sessions(config: Config, sessions: Result<SessionStore>) -> Result<Self> {
        let sessions = match sessions {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "Session storage unavailable, continuing without a session");
                None
            }
        };

        let stored = match sessions.as_ref().map(SessionStore::load) {
            Some(Ok(stored)) => stored,
            Some(Err(e)) => {
                warn!(error = %e, "Failed to load session");
                None
            }
            None => None,
        };
        debug!(has_session = stored.is_some(), "Session loaded");

        let api = ApiClient::new(&config)?;
        let authenticator = Authenticator::new(api.clone());
        let profiles = ProfileService::new(api.clone(), UploadTracker::new(api.clone(), &config));

        Ok(Self {
            config,
            sessions,
            stored,
            api,
            authenticator,
            profiles,
        })
    }

    fn session(&self) -> Result<&Session> {
        self.stored
            .as_ref()
            .map(|s| &s.session)
            .ok_or_else(|| anyhow!("Not logged in. Run `jobboard login` first."))
    }

    fn session_store(&self) -> Result<&SessionStore> {
        self.sessions.as_ref().ok_or_else(|| {
            anyhow!(
                "Session storage is unavailable. Set {} or check the cache directory.",
                SESSION_SECRET_ENV
            )
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => prompt_email(self.config.default_email())?,
        };
        let password = rpassword::prompt_password("Password: ")?;

        validate_login(&email, &password).map_err(|e| anyhow!(e.message))?;

        eprintln!("Authenticating...");
        let credentials = Credentials::new(email.clone(), password);

        match self.authenticator.authenticate(&credentials).await {
            Ok(session) => {
                self.session_store()?.save(&session)?;

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                info!(subject_id = %session.subject_id(), "Login successful");
                println!("Logged in as {} (id {})", session.email(), session.subject_id());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                Err(anyhow!(e.user_message()))
            }
        }
    }

    pub fn logout(&mut self, all: bool) -> Result<()> {
        if let Some(ref store) = self.sessions {
            store.clear()?;
        }
        self.stored = None;
        if all {
            SecretStore::new(&self.config.cache_dir()?).rotate()?;
            info!("Session secret rotated");
        }
        println!("Logged out.");
        Ok(())
    }

    pub fn whoami(&self) -> Result<()> {
        let stored = self
            .stored
            .as_ref()
            .ok_or_else(|| anyhow!("Not logged in."))?;
        println!("{} (id {})", stored.session.email(), stored.session.subject_id());
        println!("Session expires in {} hours", stored.hours_until_expiry());
        Ok(())
    }

    pub async fn register_company(&self, name: String, nit: String, email: String) -> Result<()> {
        let password = rpassword::prompt_password("Password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;

        let registration = CompanyRegistration {
            name,
            nit,
            email,
            password,
        };
        validate_company_registration(&registration, &confirm).map_err(|e| anyhow!(e.message))?;

        match self.api.register_company(&registration).await {
            Ok(()) => {
                println!("Company registered. You can now log in as {}.", registration.email);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Company registration failed");
                Err(anyhow!(e.user_message()))
            }
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn show_profile(&self) -> Result<()> {
        let profile = self
            .profiles
            .load(self.session()?)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        print_profile(&profile);
        Ok(())
    }

    pub async fn edit_profile(&self, description: Option<String>, experience: Option<String>) -> Result<()> {
        let update = ProfileUpdate {
            description,
            experience,
        };
        let profile = self
            .profiles
            .save_edits(self.session()?, &update)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        if update.is_empty() {
            println!("Nothing to change.");
        } else {
            println!("Profile updated.");
        }
        print_profile(&profile);
        Ok(())
    }

    pub async fn upload_video(&self, path: &Path) -> Result<()> {
        let session = self.session()?;
        let file = VideoFile::from_path(path)?;
        eprintln!("Uploading {} ({})", file.file_name(), format_bytes(file.size()));

        let report = self
            .profiles
            .upload_video(session, file, |percent| {
                eprint!("{}", progress_line(percent));
                let _ = io::stderr().flush();
            })
            .await;
        eprintln!();

        match report.profile {
            Ok(ref profile) => print_profile(profile),
            Err(ref e) => warn!(error = %e, "Profile could not be refreshed"),
        }

        match report.upload {
            Ok(url) => {
                println!("Video uploaded: {}", url);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, progress = report.final_progress, "Video upload failed");
                Err(anyhow!(e.user_message()))
            }
        }
    }

    // =========================================================================
    // Offers
    // =========================================================================

    pub async fn list_offers(&self, query: Option<String>, location: Option<String>) -> Result<()> {
        let offers = self
            .api
            .fetch_offers()
            .await
            .map_err(|e| anyhow!(e.user_message()))?;

        let mut filter = OfferFilter::keyword(query.unwrap_or_default());
        if let Some(location) = location {
            filter = filter.with_location(location);
        }

        let matches = filter.apply(&offers);
        if matches.is_empty() {
            println!("No offers found.");
            return Ok(());
        }

        for offer in matches {
            println!(
                "{:<width$}  {:<12}  {:<10}  {}",
                truncate_string(&offer.title, TITLE_WIDTH),
                offer.modality,
                offer.salary,
                offer.published_display(),
                width = TITLE_WIDTH,
            );
        }
        Ok(())
    }

    pub async fn create_offer(&self, offer: NewOffer) -> Result<()> {
        validate_new_offer(&offer).map_err(|e| anyhow!(e.message))?;

        let session = self.stored.as_ref().map(|s| &s.session);
        match self.api.create_offer(session, &offer).await {
            Ok(Some(created)) => println!("Offer published (id {}).", created.id),
            Ok(None) => println!("Offer published."),
            Err(e) => {
                error!(error = %e, "Failed to publish offer");
                return Err(anyhow!(e.user_message()));
            }
        }
        Ok(())
    }
}

/// Open the session store, resolving the signing secret
fn open_sessions(config: &Config) -> Result<SessionStore> {
    let cache_dir = config.cache_dir()?;
    let secret = SecretStore::new(&cache_dir).resolve()?;
    Ok(SessionStore::new(cache_dir, SessionSigner::new(&secret), config.session_max_age()))
}

/// One redraw of the upload progress line
fn progress_line(percent: u8) -> String {
    format!("\r{}", progress_bar(percent, PROGRESS_WIDTH))
}

fn prompt_email(default: Option<String>) -> Result<String> {
    match default {
        Some(ref last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).context("Failed to read email")?;
    let input = input.trim();

    match default {
        Some(last) if input.is_empty() => Ok(last),
        _ => Ok(input.to_string()),
    }
}

fn print_profile(profile: &UserProfile) {
    println!("{}", profile.full_name());
    if let Some(ref email) = profile.email {
        println!("  Email:       {}", email);
    }
    println!("  Registered:  {}", profile.registered_display());
    if let Some(ref experience) = profile.experience {
        println!("  Experience:  {}", experience);
    }
    if let Some(ref description) = profile.description {
        println!("  About:       {}", description);
    }
    match profile.video {
        Some(ref video) if profile.has_video() => println!("  Video:       {}", video),
        _ => println!("  Video:       none"),
    }
}
