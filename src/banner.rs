//! Startup banner.

use std::net::SocketAddr;

use crate::consts::{AUTHOR, VERSION};
use crate::server::limiter::RateLimitConfig;

/// Server configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub listen: SocketAddr,
    pub model: &'a str,
    pub curriculum: &'a str,
    pub grades: usize,
    pub rate_limit: RateLimitConfig,
    pub cors_origin: Option<&'a str>,
}

/// Render the banner text.
pub fn banner_text(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║               S O M O                 ║
   ║    CBC lessons, quizzes, activities   ║
   ╚═══════════════════════════════════════╝

   version     {}
   by          {}
   listen      http://{}
   model       {}
   curriculum  {} ({} grades)
   rate limit  {} requests / {}s per IP
   cors        {}
"#,
        VERSION,
        AUTHOR,
        info.listen,
        info.model,
        info.curriculum,
        info.grades,
        info.rate_limit.max_requests,
        info.rate_limit.window.as_secs(),
        info.cors_origin.unwrap_or("any origin"),
    )
}

/// Print the startup banner.
pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}
