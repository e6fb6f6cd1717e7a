//! Validated base URLs for the backend services.

// self
use crate::{_prelude::*, error::ConfigError};

/// Backend services the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
	/// Auth service (login, refresh, logout).
	Auth,
	/// Member service (profiles, follows).
	Member,
	/// Cook service (recipes and everything built on them).
	Cook,
}
impl Service {
	/// Returns a stable label for error messages and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Auth => "auth",
			Self::Member => "member",
			Self::Cook => "cook",
		}
	}
}
impl Display for Service {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Errors raised while validating service base URLs.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EndpointsError {
	/// A base URL could not be parsed.
	#[error("The {service} base URL `{url}` is not a valid URL.")]
	InvalidUrl {
		/// Which service failed validation.
		service: &'static str,
		/// Offending URL string.
		url: String,
	},
	/// Base URLs must use HTTPS outside of localhost development.
	#[error("The {service} base URL must use HTTPS: {url}.")]
	InsecureUrl {
		/// Which service failed validation.
		service: &'static str,
		/// Offending URL string.
		url: String,
	},
	/// Base URLs must not carry a path, query, or fragment.
	#[error("The {service} base URL must not carry a path, query, or fragment: {url}.")]
	NonRootUrl {
		/// Which service failed validation.
		service: &'static str,
		/// Offending URL string.
		url: String,
	},
}

/// Validated base URLs for the three backend services.
///
/// HTTPS is enforced except for localhost development hosts, mirroring the origin rules
/// the popup coordinator applies to window messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoints {
	auth: Url,
	member: Url,
	cook: Url,
}
impl ServiceEndpoints {
	/// Validates and stores the three base URLs.
	pub fn new(
		auth: impl AsRef<str>,
		member: impl AsRef<str>,
		cook: impl AsRef<str>,
	) -> Result<Self, EndpointsError> {
		Ok(Self {
			auth: validate_base(Service::Auth, auth.as_ref())?,
			member: validate_base(Service::Member, member.as_ref())?,
			cook: validate_base(Service::Cook, cook.as_ref())?,
		})
	}

	/// Points every service at one host, the single-gateway development layout.
	pub fn single_host(base: impl AsRef<str>) -> Result<Self, EndpointsError> {
		let base = base.as_ref();

		Self::new(base, base, base)
	}

	/// Base URL for the given service.
	pub fn base(&self, service: Service) -> &Url {
		match service {
			Service::Auth => &self.auth,
			Service::Member => &self.member,
			Service::Cook => &self.cook,
		}
	}

	/// Joins an absolute request path onto a service base.
	pub fn join(&self, service: Service, path: &str) -> Result<Url, ConfigError> {
		if !path.starts_with('/') {
			return Err(ConfigError::InvalidPath {
				service: service.as_str(),
				path: path.to_owned(),
			});
		}

		self.base(service).join(path).map_err(|_| ConfigError::InvalidPath {
			service: service.as_str(),
			path: path.to_owned(),
		})
	}
}

/// Whether `host` counts as a localhost development host.
pub(crate) fn is_dev_host(host: &str) -> bool {
	host == "localhost" || host == "127.0.0.1" || host == "[::1]" || host == "::1"
}

fn validate_base(service: Service, raw: &str) -> Result<Url, EndpointsError> {
	let service = service.as_str();
	let url = Url::parse(raw)
		.map_err(|_| EndpointsError::InvalidUrl { service, url: raw.to_owned() })?;
	let dev_host = url.host_str().is_some_and(is_dev_host);

	match url.scheme() {
		"https" => (),
		"http" if dev_host => (),
		_ => return Err(EndpointsError::InsecureUrl { service, url: raw.to_owned() }),
	}
	if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
		return Err(EndpointsError::NonRootUrl { service, url: raw.to_owned() });
	}

	Ok(url)
}
