//! 页面浏览统计
//!
//! - [`PageviewTracker`] - 位置变化时发送一次 `pageview`
//! - [`PageviewCollector`] - 收集端抽象，[`HttpCollector`] 为 HTTP 实现

pub mod pageview;

pub use pageview::{
    CollectorError, HIT_TYPE_PAGEVIEW, HttpCollector, PageviewCollector, PageviewEvent,
    PageviewTracker, page_of,
};
