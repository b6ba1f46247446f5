use scraper::{ElementRef, Html, Node, Selector};

use crate::formats::{Category, CategoryItem, Link, LinkType, Profile, Session};

const NAME: &str = ".c-s-speaker-info__name";
const TAGLINE: &str = ".c-s-speaker-info__tagline";
const AVATAR_IMG: &str = ".c-s-speaker-info__avatar img";
const LOCATION: &str = ".c-s-speaker-info__location";
const BIO_EN: &str = r#"div[v-if="activeLanguage.speaker == 'en'"]"#;
const BIO_PL: &str = r#"div[v-if="activeLanguage.speaker == 'pl'"]"#;
const LINKS_GROUP: &str = "div.c-s-speaker-info__group--links";
const LINK: &str = ".c-s-links__link";
const LINK_LABEL: &str = ".o-label";
const LINK_ICON: &str = "use";
const GROUP: &str = ".c-s-speaker-info__group";
const GROUP_TITLE: &str = ".c-s-speaker-info__group-title";
const GROUP_ITEM: &str = "li";

const DEFAULT_LINK_TITLE: &str = "Link";

struct Selectors {
    name: Selector,
    tagline: Selector,
    avatar_img: Selector,
    location: Selector,
    bio_en: Selector,
    bio_pl: Selector,
    links_group: Selector,
    link: Selector,
    link_label: Selector,
    link_icon: Selector,
    group: Selector,
    group_title: Selector,
    group_item: Selector,
}

impl Selectors {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            name: selector(NAME)?,
            tagline: selector(TAGLINE)?,
            avatar_img: selector(AVATAR_IMG)?,
            location: selector(LOCATION)?,
            bio_en: selector(BIO_EN)?,
            bio_pl: selector(BIO_PL)?,
            links_group: selector(LINKS_GROUP)?,
            link: selector(LINK)?,
            link_label: selector(LINK_LABEL)?,
            link_icon: selector(LINK_ICON)?,
            group: selector(GROUP)?,
            group_title: selector(GROUP_TITLE)?,
            group_item: selector(GROUP_ITEM)?,
        })
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("invalid selector {css:?}: {err:?}"))
}

/// Pulls the profile fields out of a speaker page. Elements that are missing
/// leave their field empty; only an invalid built-in selector is an error.
pub fn extract_profile(html: &str) -> anyhow::Result<Profile> {
    let sel = Selectors::new()?;
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut profile = Profile {
        full_name: first(root, &sel.name).map(trimmed_text),
        tag_line: first(root, &sel.tagline).map(trimmed_text),
        profile_picture: first(root, &sel.avatar_img)
            .and_then(|img| img.value().attr("src"))
            .map(str::to_owned),
        ..Profile::default()
    };

    match &profile.full_name {
        Some(name) => tracing::info!(name = %name, "found speaker"),
        None => tracing::warn!("speaker name not found"),
    }

    if let Some(location) = first(root, &sel.location) {
        let (city, country) = parse_location(&stripped_text(location));
        profile.city = Some(city);
        profile.country = Some(country);
    }

    profile.bio = first(root, &sel.bio_en).map(text_with_line_breaks);
    profile.bio_pl = first(root, &sel.bio_pl).map(text_with_line_breaks);

    if let Some(group) = first(root, &sel.links_group) {
        profile.links = group
            .select(&sel.link)
            .map(|link| extract_link(link, &sel))
            .collect();
    }

    for group in root.select(&sel.group) {
        let Some(title) = first(group, &sel.group_title) else {
            continue;
        };
        let title = trimmed_text(title);
        let items = group.select(&sel.group_item).map(stripped_text);

        if title.contains("Expertise") {
            let category_items = items
                .map(|name| CategoryItem { name })
                .collect::<Vec<_>>();
            if !category_items.is_empty() {
                profile.categories.push(Category { category_items });
            }
        } else if title.contains("Topics") {
            profile.sessions.extend(items.map(|name| Session { name }));
        }
    }

    tracing::debug!(
        links = profile.links.len(),
        categories = profile.categories.len(),
        sessions = profile.sessions.len(),
        "extracted profile"
    );

    Ok(profile)
}

fn extract_link(link: ElementRef<'_>, sel: &Selectors) -> Link {
    let url = link.value().attr("href").unwrap_or_default().to_owned();
    let title = first(link, &sel.link_label)
        .map(trimmed_text)
        .unwrap_or_else(|| DEFAULT_LINK_TITLE.to_owned());
    let icon = first(link, &sel.link_icon)
        .and_then(icon_reference)
        .unwrap_or_default();
    let link_type = classify_link(icon, &title);

    Link {
        title,
        url,
        link_type,
    }
}

/// `href` of an SVG `<use>`; html5ever stores `xlink:href` under the local
/// name `href`.
fn icon_reference(icon: ElementRef<'_>) -> Option<&str> {
    icon.value()
        .attrs()
        .find(|(name, _)| *name == "href" || *name == "xlink:href")
        .map(|(_, value)| value)
}

/// Icon reference gives a provisional type; a matching title rule always
/// replaces it.
pub fn classify_link(icon: &str, title: &str) -> LinkType {
    let from_icon = if icon.contains("twitter") {
        LinkType::Twitter
    } else if icon.contains("linkedin") {
        LinkType::LinkedIn
    } else if icon.contains("globe") || icon.contains("link") {
        LinkType::CompanyWebsite
    } else {
        LinkType::Other
    };

    if title.contains("Twitter") || title.contains('@') {
        LinkType::Twitter
    } else if title.contains("LinkedIn") {
        LinkType::LinkedIn
    } else if title.contains("Blog") {
        LinkType::Blog
    } else if title.contains("Company") {
        LinkType::CompanyWebsite
    } else if title.contains("GitHub") {
        LinkType::GitHub
    } else if title.contains("BuyCoffee") {
        LinkType::Other
    } else {
        from_icon
    }
}

/// Splits `City, Country` on the first comma.
pub fn parse_location(text: &str) -> (String, String) {
    match text.split_once(',') {
        Some((city, country)) => (city.trim().to_owned(), country.trim().to_owned()),
        None => (text.trim().to_owned(), String::new()),
    }
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

// Each text node trimmed, then concatenated without separators.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn text_with_line_breaks(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out.trim().to_owned()
}
