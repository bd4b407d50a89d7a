//! Rule tables of the Sapienza portal
//!
//! News and newsletter events are scraped from the public website; exams and
//! taxes come from the JSON student API.

use super::ProviderConfig;
use crate::datetime::{DatePatterns, Locale};
use crate::error::Result;
use crate::extract::{FieldRule, RuleSet};
use crate::pipeline::{DetailSpec, Listing};

const NEWS_PATH: &str = "tutte-le-notizie";
const NEWSLETTER_PATH: &str = "it/newsletter";
const SEARCH_PARAM: &str = "search_api_views_fulltext";

/// Paginated news listing for `locale`, optionally filtered by a search query
pub fn news_listing(config: &ProviderConfig, locale: Locale, query: Option<&str>) -> Result<Listing> {
    let url = config.website(&format!("{}/{}", locale.tag(), NEWS_PATH))?;
    let rules = RuleSet::new(".box-news")
        .field(FieldRule::attr("title", "img[title]", "title").required())
        .field(FieldRule::attr("url", "a[href]", "href").required().link())
        .field(FieldRule::attr("small_image", "img[src]", "src").link())
        .title("title");

    let listing = Listing::new(url, rules);
    Ok(match query {
        Some(query) => listing.param(SEARCH_PARAM, query),
        None => listing,
    })
}

/// Article page of a news item
pub fn news_detail(with_description: bool) -> DetailSpec {
    let mut rules = RuleSet::new("html")
        .field(FieldRule::text("date", ".date-display-single"))
        .field(FieldRule::attr("image", ".img-responsive[src]", "src").link());
    if with_description {
        rules = rules.field(FieldRule::text(
            "description",
            "[class$=testosommario] .field-item.even",
        ));
    }
    DetailSpec::new("url", rules)
}

/// Events announced in the newsletter
pub fn newsletter_listing(config: &ProviderConfig) -> Result<Listing> {
    let url = config.website(NEWSLETTER_PATH)?;
    let rules = RuleSet::new(".event")
        .field(FieldRule::text("title", ".views-field-solr-document a").required())
        .field(
            FieldRule::attr("url", ".views-field-solr-document a", "href")
                .required()
                .link(),
        )
        .title("title");
    Ok(Listing::new(url, rules).unpaged())
}

/// Event page, one record per date and place block
pub fn event_detail() -> DetailSpec {
    DetailSpec::new(
        "url",
        RuleSet::new("html")
            .field(FieldRule::attr("image", ".field-type-image img", "src").link())
            .field(FieldRule::text("description", ".article-body")),
    )
    .blocks(
        RuleSet::new(".view-date-and-place .view-content > .views-row")
            .field(FieldRule::text("start", ".views-field-php.field-apm-date .field-content").required())
            .field(FieldRule::text("room", ".views-field-field-apm-aula .field-content"))
            .field(FieldRule::text("place", ".views-field-field-apm-edificio .field-content")),
    )
}

/// Event dates are always Italian on the newsletter
pub fn event_dates() -> DatePatterns {
    DatePatterns::for_locale(Locale::Italian)
}

/// Date formats of the student API
pub fn api_dates() -> DatePatterns {
    DatePatterns::new(
        Locale::Italian,
        ["%d/%m/%Y %H:%M", "%d/%m/%Y", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"],
    )
}

fn api_listing(config: &ProviderConfig, path: &str, token: &str, rules: RuleSet) -> Result<Listing> {
    Ok(Listing::new(config.api(path)?, rules)
        .unpaged()
        .param(&config.token_param, token))
}

pub fn exams_doable(config: &ProviderConfig, student_id: &str, token: &str) -> Result<Listing> {
    let rules = RuleSet::new("/ritorno/esami")
        .field(FieldRule::pointer("exam_code", "/codiceInsegnamento").required())
        .field(FieldRule::pointer("description", "/descrizione").required())
        .field(FieldRule::pointer("course_code", "/codiceCorsoInsegnamento").required())
        .field(FieldRule::pointer("cfu", "/cfu").required())
        .field(FieldRule::pointer("ssd", "/ssd"))
        .field(FieldRule::pointer("module_code", "/codiceModuloDidattico"))
        .title("description");
    api_listing(
        config,
        &format!("studente/{}/insegnamentisostenibili", student_id),
        token,
        rules,
    )
}

fn reservation_rules() -> RuleSet {
    RuleSet::new("/ritorno/appelli")
        .field(FieldRule::pointer("report_id", "/codIdenVerb").required())
        .field(FieldRule::pointer("session_id", "/codAppe").required())
        .field(FieldRule::pointer("exam_subject", "/descrizione").required())
        .field(FieldRule::pointer("exam_date", "/dataAppe").required())
        .field(FieldRule::pointer("course_code", "/codCorsoStud"))
        .field(FieldRule::pointer("teacher", "/docente"))
        .field(FieldRule::pointer("channel", "/canale"))
        .field(FieldRule::pointer("start_booking", "/dataInizioPrenotazione"))
        .field(FieldRule::pointer("end_booking", "/dataFinePrenotazione"))
        .field(FieldRule::pointer("reservation_number", "/numeroPrenotazione"))
        .field(FieldRule::pointer("note", "/note"))
        .title("exam_subject")
}

pub fn active_reservations(config: &ProviderConfig, student_id: &str, token: &str) -> Result<Listing> {
    api_listing(
        config,
        &format!("studente/{}/prenotazioni", student_id),
        token,
        reservation_rules(),
    )
}

pub fn available_reservations(
    config: &ProviderConfig,
    student_id: &str,
    token: &str,
    course_code: &str,
    exam_code: &str,
) -> Result<Listing> {
    api_listing(
        config,
        &format!("appello/ricerca/{}/{}/{}", student_id, course_code, exam_code),
        token,
        reservation_rules(),
    )
}

/// Payment slips; paid slips must carry their payment date
pub fn taxes(config: &ProviderConfig, student_id: &str, token: &str, paid: bool) -> Result<Listing> {
    let payment_date = FieldRule::pointer("payment_date", "/dataPagamento");
    let (path, payment_date) = if paid {
        ("bollettinipagati", payment_date.required())
    } else {
        ("bollettininonpagati", payment_date)
    };

    let rules = RuleSet::new("/risultatoLista/risultati")
        .field(FieldRule::pointer("code", "/codiceBollettino").required())
        .field(FieldRule::pointer("amount", "/importoBollettino").required())
        .field(FieldRule::pointer("description", "/causale"))
        .field(FieldRule::pointer("course_code", "/codiceCorso"))
        .field(FieldRule::pointer("academic_year", "/annoAcc"))
        .field(FieldRule::pointer("expiration_date", "/scadenza"))
        .field(payment_date);
    api_listing(
        config,
        &format!("contabilita/{}/{}", student_id, path),
        token,
        rules,
    )
}
