pub mod feeds;

pub use feeds::FeedRepository;
