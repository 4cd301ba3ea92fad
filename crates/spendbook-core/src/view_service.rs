use chrono::NaiveDate;
use spendbook_domain::{PeriodLabel, ViewMode, ViewState};
use tracing::{debug, info};

use crate::CoreResult;

/// Applies user navigation to a [`ViewState`].
pub struct ViewService;

impl ViewService {
    pub fn switch(view: &mut ViewState, mode: ViewMode) {
        view.mode = mode;
        info!(%mode, "view switched");
    }

    pub fn navigate(view: &mut ViewState, steps: i32, today: NaiveDate) -> CoreResult<()> {
        view.navigate(steps, today)?;
        debug!(?view, steps, "view navigated");
        Ok(())
    }

    pub fn go_to_current(view: &mut ViewState, today: NaiveDate) {
        view.go_to_current(today);
        info!("view reset to current period");
    }

    pub fn apply_custom_range(
        view: &mut ViewState,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> CoreResult<()> {
        view.set_custom_range(start, end)?;
        info!(?start, ?end, "custom range applied");
        Ok(())
    }

    pub fn apply_quick_range(view: &mut ViewState, days: i64, today: NaiveDate) -> CoreResult<()> {
        view.quick_range(days, today)?;
        info!(days, "quick range applied");
        Ok(())
    }

    pub fn period_label(view: &ViewState, today: NaiveDate) -> PeriodLabel {
        view.period_label(today)
    }
}
