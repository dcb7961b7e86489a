use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour given to new staff and task types.
pub const DEFAULT_COLOR: &str = "#5d109c";

/// Icons a task type may carry.
pub const TASK_TYPE_ICONS: [&str; 10] = [
    "camera", "video", "image", "film", "briefcase", "users", "package", "calendar", "star", "heart",
];

/// A client of the studio.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A member of staff who can be assigned tasks and posts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A category of work (shoot, edit, delivery...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskType {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A unit of scheduled work with an optional delivery deadline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub description: String,
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub task_type_id: Option<u64>,
    #[serde(default)]
    pub employee_id: Option<u64>,
    /// Day the work happens on.
    pub due_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gallery_link: Option<String>,
    /// Delivery deadline, tracked by the urgency engine.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    /// Length of the countdown alert window; 120 hours when unset.
    #[serde(default)]
    pub alert_window_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A named kind of social post.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostType {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// One entry of the social-media posting calendar.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduledPost {
    pub id: u64,
    pub client_id: u64,
    pub post_kind: PostKind,
    pub networks: Vec<SocialNetwork>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    pub status: PostStatus,
    pub title: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SocialNetwork {
    Instagram,
    Facebook,
    TikTok,
    YouTube,
    LinkedIn,
    X,
}

impl SocialNetwork {
    pub const ALL: [SocialNetwork; 6] = [
        SocialNetwork::Instagram,
        SocialNetwork::Facebook,
        SocialNetwork::TikTok,
        SocialNetwork::YouTube,
        SocialNetwork::LinkedIn,
        SocialNetwork::X,
    ];
}

impl fmt::Display for SocialNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocialNetwork::Instagram => "Instagram",
            SocialNetwork::Facebook => "Facebook",
            SocialNetwork::TikTok => "TikTok",
            SocialNetwork::YouTube => "YouTube",
            SocialNetwork::LinkedIn => "LinkedIn",
            SocialNetwork::X => "X (Twitter)",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SocialNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Ok(SocialNetwork::Instagram),
            "facebook" | "fb" => Ok(SocialNetwork::Facebook),
            "tiktok" => Ok(SocialNetwork::TikTok),
            "youtube" | "yt" => Ok(SocialNetwork::YouTube),
            "linkedin" => Ok(SocialNetwork::LinkedIn),
            "x" | "twitter" | "x (twitter)" => Ok(SocialNetwork::X),
            other => Err(format!("unknown social network '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostKind {
    #[default]
    Reel,
    Carrossel,
    Foto,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PostKind::Reel => "Reel",
            PostKind::Carrossel => "Carrossel",
            PostKind::Foto => "Foto",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reel" => Ok(PostKind::Reel),
            "carrossel" | "carousel" => Ok(PostKind::Carrossel),
            "foto" | "photo" => Ok(PostKind::Foto),
            other => Err(format!("unknown post kind '{}' (Reel, Carrossel, Foto)", other)),
        }
    }
}

/// Editorial workflow of a post.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "Planejado")]
    Planned,
    #[serde(rename = "Em Produção")]
    InProduction,
    #[serde(rename = "Aprovado")]
    Approved,
    #[serde(rename = "Postado")]
    Posted,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Planned,
        PostStatus::InProduction,
        PostStatus::Approved,
        PostStatus::Posted,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            PostStatus::Planned => "#6366f1",
            PostStatus::InProduction => "#f59e0b",
            PostStatus::Approved => "#22c55e",
            PostStatus::Posted => "#06b6d4",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PostStatus::Planned => "Planejado",
            PostStatus::InProduction => "Em Produção",
            PostStatus::Approved => "Aprovado",
            PostStatus::Posted => "Postado",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planejado" | "planned" => Ok(PostStatus::Planned),
            "em produção" | "em producao" | "in-production" | "production" => Ok(PostStatus::InProduction),
            "aprovado" | "approved" => Ok(PostStatus::Approved),
            "postado" | "posted" => Ok(PostStatus::Posted),
            other => Err(format!("unknown post status '{}'", other)),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    TASK_TYPE_ICONS[0].to_string()
}

/// Parses `#rrggbb` into its channels.
pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
