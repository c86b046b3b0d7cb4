use log::debug;
use reqwest::header::HeaderValue;
use url::Url;

/// Page count advertised by a builds response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Always at least 1
    pub last_page: u32,
}

impl PaginationInfo {
    pub fn single_page() -> Self {
        Self { last_page: 1 }
    }

    /// Reads the `rel="last"` entry of a `Link` header.
    ///
    /// Buildkite only sends a `last` relation when more than one page exists,
    /// so every case where it cannot be read falls back to a single page:
    /// missing header, no `last` relation, an unparsable target URL, or a
    /// missing, non-numeric or zero `page` parameter.
    pub fn from_link_header(header: Option<&HeaderValue>) -> Self {
        let Some(header) = header else {
            debug!("No Link header present, assuming a single page");
            return Self::single_page();
        };

        let Ok(value) = header.to_str() else {
            debug!("Link header is not valid ASCII, assuming a single page");
            return Self::single_page();
        };

        match last_page_from_link(value) {
            Some(last_page) => Self { last_page },
            None => {
                debug!("Link header has no usable rel=\"last\" entry ({value}), assuming a single page");
                Self::single_page()
            }
        }
    }
}

fn last_page_from_link(value: &str) -> Option<u32> {
    split_link_entries(value)
        .into_iter()
        .filter_map(parse_link_entry)
        .find(|(_, rels)| rels.iter().any(|rel| rel.eq_ignore_ascii_case("last")))
        .and_then(|(target, _)| page_param(target))
}

/// Splits a `Link` header on the commas that separate entries. Commas inside
/// a `<...>` target or a quoted parameter value belong to the entry.
fn split_link_entries(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_target = false;
    let mut in_quotes = false;

    for (i, c) in value.char_indices() {
        match c {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                entries.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&value[start..]);

    entries
}

/// Splits `<target>; rel="a b"; other=x` into the target and its relation tokens.
fn parse_link_entry(entry: &str) -> Option<(&str, Vec<&str>)> {
    let entry = entry.trim();
    let target_end = entry.find('>')?;
    let target = entry.strip_prefix('<')?.get(..target_end - 1)?;

    let rels = entry[target_end + 1..]
        .split(';')
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .flat_map(str::split_whitespace)
        .collect();

    Some((target, rels))
}

fn page_param(target: &str) -> Option<u32> {
    let url = Url::parse(target).ok()?;
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")?
        .1
        .parse::<u32>()
        .ok()?;

    (page >= 1).then_some(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(value: &str) -> PaginationInfo {
        let header = HeaderValue::from_str(value).unwrap();
        PaginationInfo::from_link_header(Some(&header))
    }

    mod from_link_header {
        use super::*;

        #[test]
        fn reads_last_page_from_buildkite_header() {
            let info = from_str(
                "<https://api.buildkite.com/v2/organizations/acme/pipelines/web/builds?page=2&per_page=100>; rel=\"next\", \
                 <https://api.buildkite.com/v2/organizations/acme/pipelines/web/builds?page=6&per_page=100>; rel=\"last\"",
            );
            assert_eq!(info.last_page, 6);
        }

        #[test]
        fn defaults_to_one_without_header() {
            assert_eq!(PaginationInfo::from_link_header(None).last_page, 1);
        }

        #[test]
        fn defaults_to_one_without_last_relation() {
            let info = from_str(
                "<https://api.buildkite.com/v2/builds?page=1>; rel=\"first\", \
                 <https://api.buildkite.com/v2/builds?page=1>; rel=\"prev\"",
            );
            assert_eq!(info.last_page, 1);
        }

        #[test]
        fn defaults_to_one_for_garbage() {
            assert_eq!(from_str("not a link header").last_page, 1);
        }

        #[test]
        fn defaults_to_one_when_page_is_missing() {
            let info = from_str("<https://api.buildkite.com/v2/builds?per_page=100>; rel=\"last\"");
            assert_eq!(info.last_page, 1);
        }

        #[test]
        fn defaults_to_one_when_page_is_not_numeric() {
            let info = from_str("<https://api.buildkite.com/v2/builds?page=last>; rel=\"last\"");
            assert_eq!(info.last_page, 1);
        }

        #[test]
        fn defaults_to_one_when_page_is_zero() {
            let info = from_str("<https://api.buildkite.com/v2/builds?page=0>; rel=\"last\"");
            assert_eq!(info.last_page, 1);
        }

        #[test]
        fn keeps_commas_inside_targets() {
            let info = from_str(
                "<https://api.buildkite.com/v2/builds?page=2&branch=main,release>; rel=\"next\", \
                 <https://api.buildkite.com/v2/builds?page=7&branch=main,release>; rel=\"last\"",
            );
            assert_eq!(info.last_page, 7);
        }

        #[test]
        fn keeps_commas_inside_quoted_parameters() {
            let info = from_str(
                "<https://api.buildkite.com/v2/builds?page=3>; title=\"a, b\"; rel=\"last\"",
            );
            assert_eq!(info.last_page, 3);
        }

        #[test]
        fn accepts_relation_lists_and_unquoted_values() {
            assert_eq!(
                from_str("<https://api.buildkite.com/v2/builds?page=4>; rel=\"next last\"").last_page,
                4
            );
            assert_eq!(
                from_str("<https://api.buildkite.com/v2/builds?page=9>; rel=LAST").last_page,
                9
            );
        }
    }
}
