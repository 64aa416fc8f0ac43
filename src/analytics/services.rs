use std::collections::{BTreeMap, HashMap, HashSet};

use crate::analytics::dto::{ChatEngagement, DashboardResponse, TopArticle};
use crate::analytics::repo_types::AnalyticsEvent;

const TOP_ARTICLES: usize = 5;

/// Pure counting over a window of events. Articles whose title is no
/// longer resolvable are reported as "Unknown" rather than dropped.
pub fn summarize(events: &[AnalyticsEvent], titles: &HashMap<i32, String>) -> DashboardResponse {
    let total_sessions = events
        .iter()
        .map(|e| e.session_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut views_by_article: HashMap<i32, usize> = HashMap::new();
    for event in events {
        if let Some(article_id) = event.article_id {
            *views_by_article.entry(article_id).or_default() += 1;
        }
    }
    let mut top_articles: Vec<TopArticle> = views_by_article
        .into_iter()
        .map(|(id, views)| TopArticle {
            id,
            title: titles.get(&id).cloned().unwrap_or_else(|| "Unknown".into()),
            views,
        })
        .collect();
    top_articles.sort_by(|a, b| b.views.cmp(&a.views).then(a.id.cmp(&b.id)));
    top_articles.truncate(TOP_ARTICLES);

    let mut event_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *event_breakdown.entry(event.event.clone()).or_default() += 1;
    }

    let chat_events: Vec<&AnalyticsEvent> =
        events.iter().filter(|e| e.event == "chat").collect();
    let total_chats = chat_events
        .iter()
        .map(|e| e.session_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let average_messages_per_session = if total_chats > 0 {
        (chat_events.len() as f64 / total_chats as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    DashboardResponse {
        total_sessions,
        total_events: events.len(),
        top_articles,
        event_breakdown,
        chat_engagement: ChatEngagement {
            total_chats,
            average_messages_per_session,
        },
    }
}
