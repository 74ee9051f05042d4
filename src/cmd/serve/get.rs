// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::html;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::view::Completed;
use crate::cmd::serve::view::add_topic_form;
use crate::cmd::serve::view::render_topic;
use crate::types::date::Date;

#[derive(Deserialize)]
pub struct PageQuery {
    done: Option<String>,
}

pub async fn get_handler(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Html<String>) {
    let plan = state.snapshot();
    let today = Date::today();
    let completed = query.done.as_deref().and_then(Completed::parse);
    let body = html! {
        div.root {
            header {
                h1 { "Study Planner" }
                p.quote {
                    "\"मैं ज्वाला हूँ बुझी राख नहीं, मैं कर्म के साथ हूँ किस्मत के साथ नहीं।\""
                }
            }
            main {
                (add_topic_form())
                @for topic in plan.topics() {
                    (render_topic(topic, today, completed))
                }
            }
            footer {
                p { "Designed for focus and clarity. Happy studying!" }
            }
        }
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}
