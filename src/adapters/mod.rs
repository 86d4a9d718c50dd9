//! 外部系統的具體實作：Partner API 的 HTTP 傳輸與本機檔案儲存

pub mod http;
pub mod storage;

pub use http::PartnersClient;
pub use storage::LocalStorage;
