use std::collections::HashMap;
use std::fmt::Write;
use std::str::FromStr;

use reqwest::Url;
use time::Date;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{ItemQuery, PaginatedResponse, TrackingItem};
use crate::routes::{Navigation, RouteTable, View};

const MAX_REDIRECTS: usize = 5;

pub struct ViewContext<'a> {
    pub args: &'a [String],
    pub query: HashMap<String, String>,
    pub page_size: u32,
    pub today: Date,
}

/// Resolves `path` against the route table, following redirects, and
/// renders the resulting view as text.
pub async fn open(
    routes: &RouteTable,
    client: &ApiClient,
    path: &str,
    args: &[String],
    page_size: u32,
    today: Date,
) -> Result<String, ClientError> {
    let mut current = path.to_string();

    for _ in 0..MAX_REDIRECTS {
        match routes.resolve(&current, client.is_authenticated()) {
            Some(Navigation::Render { view, params }) => {
                info!(path = %current, ?view, "Rendering view");
                let ctx = ViewContext {
                    args,
                    query: parse_query(&current)?,
                    page_size,
                    today,
                };
                return render(client, view, &params, &ctx).await;
            }
            Some(Navigation::Redirect(to)) => {
                debug!(from = %current, to = %to, "Redirecting");
                current = to;
            }
            None => return Err(ClientError::NotFound),
        }
    }

    Err(ClientError::Config(format!("too many redirects from {path}")))
}

pub async fn render(
    client: &ApiClient,
    view: View,
    params: &HashMap<String, String>,
    ctx: &ViewContext<'_>,
) -> Result<String, ClientError> {
    match view {
        View::Login => {
            let email = ctx
                .args
                .first()
                .ok_or(ClientError::Validation("usage: /login <email>"))?;
            client.request_otp(email).await?;
            Ok(format!(
                "A one-time passcode was sent to {email}.\nRun: timekeeper /login/verify {email} <code>\n"
            ))
        }
        View::VerifyOtp => {
            let (Some(email), Some(code)) = (ctx.args.first(), ctx.args.get(1)) else {
                return Err(ClientError::Validation("usage: /login/verify <email> <code>"));
            };
            client.verify_otp(email, code).await?;
            Ok("Logged in.\n".to_string())
        }
        View::Dashboard => {
            let query = ItemQuery {
                page: Some(1),
                page_size: Some(ctx.page_size),
                is_done: Some(false),
                ..Default::default()
            };
            let page = client.list_items(&query).await?;
            Ok(render_dashboard(&page.items, ctx.today))
        }
        View::Items => {
            let page_number =
                query_value::<u32>(&ctx.query, "page", "page must be a positive number")?
                    .unwrap_or(1);
            if page_number == 0 {
                return Err(ClientError::Validation("page must be a positive number"));
            }
            let query = ItemQuery {
                page: Some(page_number),
                page_size: Some(ctx.page_size),
                category_id: query_value(
                    &ctx.query,
                    "category_id",
                    "category_id must be a number",
                )?,
                is_done: query_value(&ctx.query, "is_done", "is_done must be true or false")?,
            };
            let page = client.list_items(&query).await?;
            Ok(render_item_page(&page, &query))
        }
        View::ItemDetail => {
            let id: i64 = params
                .get("id")
                .and_then(|id| id.parse().ok())
                .ok_or(ClientError::Validation("item id must be a number"))?;
            let item = client.get_item(id).await?;
            Ok(render_item(&item))
        }
        View::Categories => {
            let categories = client.list_categories().await?;
            let mut out = String::new();
            for category in &categories {
                let kind = if category.is_predefined { "built-in" } else { "custom" };
                let _ = writeln!(out, "{:>5}  {} ({kind})", category.id, category.name);
            }
            if categories.is_empty() {
                out.push_str("No categories.\n");
            }
            Ok(out)
        }
        View::Profile => {
            let user = client.current_user().await?;
            Ok(format!(
                "User #{}\nEmail: {}\nMember since: {}\n",
                user.id, user.email, user.created_at
            ))
        }
    }
}

/// One page of items, followed by links to the neighbouring pages that keep
/// the same filters.
pub fn render_item_page(page: &PaginatedResponse<TrackingItem>, query: &ItemQuery) -> String {
    let mut out = String::new();
    for item in &page.items {
        let mark = if item.is_done { "x" } else { " " };
        let _ = writeln!(
            out,
            "[{mark}] {:>5}  {}  {}",
            item.id, item.reminder_date, item.title
        );
    }
    if page.items.is_empty() {
        out.push_str("No tracking items.\n");
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} items)",
        page.page, page.pages, page.total
    );
    if page.has_previous() {
        let _ = writeln!(out, "Previous: {}", items_link(query, page.page - 1));
    }
    if page.has_next() {
        let _ = writeln!(out, "Next: {}", items_link(query, page.page + 1));
    }
    out
}

fn items_link(query: &ItemQuery, page: u32) -> String {
    let target = ItemQuery {
        category_id: query.category_id,
        is_done: query.is_done,
        ..ItemQuery::page(page)
    };
    let pairs: Vec<String> = target
        .to_pairs()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("/items?{}", pairs.join("&"))
}

pub fn render_item(item: &TrackingItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", item.id, item.title);
    match item.category {
        Some(ref category) => {
            let _ = writeln!(out, "Category: {}", category.name);
        }
        None => {
            let _ = writeln!(out, "Category: #{}", item.category_id);
        }
    }
    let _ = writeln!(out, "Reminder: {}", item.reminder_date);
    let _ = writeln!(out, "Status: {}", if item.is_done { "done" } else { "open" });
    if let Some(ref description) = item.description {
        let _ = writeln!(out, "\n{description}");
    }
    out
}

/// Open items ordered by reminder date, with the distance from `today`.
pub fn render_dashboard(items: &[TrackingItem], today: Date) -> String {
    let mut dated: Vec<(Option<Date>, &TrackingItem)> = items
        .iter()
        .map(|item| (item.reminder_date().ok(), item))
        .collect();
    dated.sort_by_key(|(date, item)| (date.is_none(), *date, item.id));

    let mut out = String::from("Upcoming reminders\n");
    if dated.is_empty() {
        out.push_str("Nothing due.\n");
    }
    for (date, item) in dated {
        let when = match date {
            Some(date) => describe_distance((date - today).whole_days()),
            None => "unknown date".to_string(),
        };
        let _ = writeln!(out, "{:>5}  {:<12} {}", item.id, when, item.title);
    }
    out
}

fn describe_distance(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d < 0 => format!("{} days ago", -d),
        d => format!("in {d} days"),
    }
}

fn parse_query(path: &str) -> Result<HashMap<String, String>, ClientError> {
    let base =
        Url::parse("http://localhost/").map_err(|err| ClientError::Config(err.to_string()))?;
    let url = base
        .join(path)
        .map_err(|_| ClientError::Validation("path is not a valid location"))?;
    Ok(url.query_pairs().into_owned().collect())
}

fn query_value<T: FromStr>(
    query: &HashMap<String, String>,
    key: &str,
    invalid: &'static str,
) -> Result<Option<T>, ClientError> {
    query
        .get(key)
        .map(|raw| raw.parse().map_err(|_| ClientError::Validation(invalid)))
        .transpose()
}
