//! Derived values the rendering layer needs but that are not state of their own.

use crate::{filters::has_selected_filters, state::AssetsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageType {
    #[default]
    Skeleton,
    NoAssets,
    NoResults,
    Normal,
}

/// Chooses which assets page to show for `state`.
///
/// While a list fetch is the latest status the previously shown page type is kept, so
/// the page does not flash empty between request and response.
pub fn page_type(state: &AssetsState, previous: PageType) -> PageType {
    if state.status.is_list_in_flight() {
        previous
    } else if !state.collection.is_empty() {
        PageType::Normal
    } else if has_selected_filters(&state.filters.asset_types) {
        PageType::NoResults
    } else {
        PageType::NoAssets
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{Asset, AssetId};

    use super::*;
    use crate::{
        events::{AssetEvent, ListEvent},
        filters::filters_from_selected,
        state::Status,
    };

    fn asset(id: &str) -> Asset {
        Asset {
            id: AssetId::new(id),
            display_name: format!("{id}.png"),
            content_type: "image/png".into(),
            date_added: String::new(),
            url: format!("/static/{id}.png"),
            locked: false,
            portable_url: None,
            external_url: None,
            thumbnail: None,
            loading_fields: Default::default(),
        }
    }

    #[test]
    fn keeps_previous_type_while_listing() {
        let state = AssetsState {
            status: Status(Some(AssetEvent::List(ListEvent::Requested))),
            ..AssetsState::default()
        };
        assert_eq!(page_type(&state, PageType::Skeleton), PageType::Skeleton);
        assert_eq!(page_type(&state, PageType::Normal), PageType::Normal);
    }

    #[test]
    fn distinguishes_empty_course_from_empty_filter_result() {
        let mut state = AssetsState::default();
        assert_eq!(page_type(&state, PageType::Skeleton), PageType::NoAssets);

        state.filters.asset_types = filters_from_selected(["Images"]);
        assert_eq!(page_type(&state, PageType::Skeleton), PageType::NoResults);

        state.collection.push(asset("a1"));
        assert_eq!(page_type(&state, PageType::NoResults), PageType::Normal);
    }
}
