//! # scream-service
//!
//! Application layer: the scream operations exposed to front-ends, the
//! daily/weekly digests, and the external capabilities they drive (image
//! rendering, channel publishing).

pub mod channel;
pub mod dto;
pub mod render;
pub mod scheduler;
pub mod services;

pub use channel::{ChannelPublisher, LogChannel, Published, TelegramChannel};
pub use render::{DisabledRenderer, HttpRenderer, ImageRenderer, ImgflipRenderer, QuickChartRenderer};
pub use scheduler::{DigestJob, DigestScheduler};
pub use services::{
    DigestService, ScreamService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
