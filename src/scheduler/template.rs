//! Template replay: rebuild a day from a previous program's structure.
//!
//! Every template entry becomes a slot of the category its source folder
//! resolves to. Slots get a fresh recency pick, identifier slots get the
//! current identifier clip. Filler entries of the template are dropped and
//! recomputed from the gap between a slot and its fresh pick.

use chrono::NaiveDate;

use crate::catalog::CategoryResolver;
use crate::config::Config;
use crate::domain::{CategoryPool, MediaItem, Program, ProgramItem};
use crate::scheduler::builder::ProgramBuilder;
use crate::scheduler::recency::RecencySelector;
use crate::state::PlaybackState;

pub struct TemplateReplay<'a> {
    config: &'a Config,
    resolver: &'a CategoryResolver,
    pool: &'a CategoryPool,
    identifier: Option<&'a MediaItem>,
    selector: RecencySelector,
}

impl<'a> TemplateReplay<'a> {
    pub fn new(
        config: &'a Config,
        resolver: &'a CategoryResolver,
        pool: &'a CategoryPool,
        identifier: Option<&'a MediaItem>,
    ) -> Self {
        Self {
            config,
            resolver,
            pool,
            identifier,
            selector: RecencySelector::from_config(&config.selection),
        }
    }

    fn category_of(&self, slot: &ProgramItem) -> &str {
        self.resolver.resolve(slot.folder_name().as_deref().unwrap_or_default())
    }

    fn is_identifier_slot(&self, slot: &ProgramItem) -> bool {
        slot.file_name().is_some_and(|name| name.contains(&self.config.identifier.file))
            || self.category_of(slot) == self.config.identifier.category
    }

    /// Replay `template` for `date`. Every pick is committed to `state`.
    pub fn build(&self, template: &Program, state: &mut PlaybackState, date: NaiveDate) -> Vec<ProgramItem> {
        let fillers = &self.config.fillers;
        let threshold = self.config.identifier.threshold();
        let mut out = ProgramBuilder::new(date.and_time(self.config.schedule.day_start));

        for (idx, slot) in template.program.iter().enumerate() {
            if self.is_identifier_slot(slot) {
                if let Some(identifier) = self.identifier
                    && !out.last_was_identifier()
                {
                    out.emit_identifier(identifier);
                }
                continue;
            }

            let category = self.category_of(slot);
            if fillers.is_filler(category) {
                continue;
            }

            let Some(item) = self.selector.select(self.pool, category, state, None, out.now()) else {
                log::debug!("No '{}' clip for template slot {}, skipping", category, slot.source);
                continue;
            };
            out.emit(&item);

            let gap = slot.duration - item.duration;
            if gap > fillers.tolerance_secs
                && let Some(tier) = fillers.tier_for(gap)
            {
                match self.selector.select(self.pool, &tier.category, state, None, out.now()) {
                    Some(filler) => out.emit_filler(&filler),
                    None => log::debug!("No '{}' filler for a {:.0}s gap", tier.category, gap),
                }
            }

            let next_is_identifier = template
                .program
                .get(idx + 1)
                .is_some_and(|next| self.is_identifier_slot(next));
            if let Some(identifier) = self.identifier
                && !next_is_identifier
                && out.identifier_due(threshold)
            {
                out.emit_identifier(identifier);
            }
        }

        log::info!(
            "Replayed {} template slots into {} items for {}",
            template.len(),
            out.len(),
            date
        );
        out.finish()
    }
}
