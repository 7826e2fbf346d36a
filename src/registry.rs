use crate::config::HttpConfig;
use crate::scrapers::brisbane::{powerhouse, the_triffid};
use crate::scrapers::dublin::{hugh_lane_gallery, whelans};
use crate::scrapers::portland::{crystal_ballroom, revolution_hall};
use crate::scrapers::queenstown::{queenstown_gardens, sherwood};
use crate::scrapers::vancouver::{fox_cabaret, rickshaw_theatre};
use crate::scrapers::wellington::{city_gallery, san_fran};
use crate::types::VenueScraper;

pub const VANCOUVER: &str = "vancouver";
pub const BRISBANE: &str = "brisbane";
pub const DUBLIN: &str = "dublin";
pub const PORTLAND: &str = "portland";
pub const QUEENSTOWN: &str = "queenstown";
pub const WELLINGTON: &str = "wellington";

/// Every city with at least one registered venue adapter.
pub fn all_cities() -> Vec<&'static str> {
    vec![VANCOUVER, BRISBANE, DUBLIN, PORTLAND, QUEENSTOWN, WELLINGTON]
}

/// Source ids registered for one city.
pub fn sources_for_city(city: &str) -> Vec<&'static str> {
    match city.to_lowercase().as_str() {
        VANCOUVER => vec![fox_cabaret::SOURCE_ID, rickshaw_theatre::SOURCE_ID],
        BRISBANE => vec![the_triffid::SOURCE_ID, powerhouse::SOURCE_ID],
        DUBLIN => vec![whelans::SOURCE_ID, hugh_lane_gallery::SOURCE_ID],
        PORTLAND => vec![crystal_ballroom::SOURCE_ID, revolution_hall::SOURCE_ID],
        QUEENSTOWN => vec![sherwood::SOURCE_ID, queenstown_gardens::SOURCE_ID],
        WELLINGTON => vec![san_fran::SOURCE_ID, city_gallery::SOURCE_ID],
        _ => Vec::new(),
    }
}

/// All registered source ids, grouped by city order.
pub fn all_sources() -> Vec<&'static str> {
    all_cities()
        .into_iter()
        .flat_map(sources_for_city)
        .collect()
}

/// Instantiate an adapter by source id.
pub fn create_scraper(source_id: &str, config: &HttpConfig) -> Option<Box<dyn VenueScraper>> {
    match source_id {
        fox_cabaret::SOURCE_ID => Some(Box::new(fox_cabaret::FoxCabaretScraper::new(config))),
        rickshaw_theatre::SOURCE_ID => Some(Box::new(
            rickshaw_theatre::RickshawTheatreScraper::new(config),
        )),
        the_triffid::SOURCE_ID => Some(Box::new(the_triffid::TheTriffidScraper::new(config))),
        powerhouse::SOURCE_ID => Some(Box::new(powerhouse::PowerhouseScraper::new(config))),
        whelans::SOURCE_ID => Some(Box::new(whelans::WhelansScraper::new(config))),
        hugh_lane_gallery::SOURCE_ID => Some(Box::new(
            hugh_lane_gallery::HughLaneGalleryScraper::new(config),
        )),
        crystal_ballroom::SOURCE_ID => Some(Box::new(
            crystal_ballroom::CrystalBallroomScraper::new(config),
        )),
        revolution_hall::SOURCE_ID => Some(Box::new(
            revolution_hall::RevolutionHallScraper::new(config),
        )),
        sherwood::SOURCE_ID => Some(Box::new(sherwood::SherwoodScraper::new(config))),
        queenstown_gardens::SOURCE_ID => Some(Box::new(
            queenstown_gardens::QueenstownGardensScraper::new(config),
        )),
        san_fran::SOURCE_ID => Some(Box::new(san_fran::SanFranScraper::new(config))),
        city_gallery::SOURCE_ID => Some(Box::new(city_gallery::CityGalleryScraper::new(config))),
        _ => None,
    }
}
