//! Small end-to-end fixture for entity generator tests

use chrono::{TimeZone, Utc};

use crate::cohort::CohortBehaviorModel;
use crate::curve::IntensityCurve;
use crate::entities::signals::HourlySignals;
use crate::orders::{generate_orders, HourlyPlan, OrderEngine, OrderStream, RunState};
use crate::reference::{ReferenceData, ReferenceGenerator};
use crate::scenario::{ScenarioBuilder, ScenarioConfig};
use crate::simulation::rng::{RngBank, StreamRng, StreamSlot};

pub(crate) struct Fixture {
    pub(crate) config: ScenarioConfig,
    pub(crate) cohorts: CohortBehaviorModel,
    pub(crate) reference: ReferenceData,
    pub(crate) plan: HourlyPlan,
    pub(crate) signals: HourlySignals,
    pub(crate) orders: OrderStream,
}

impl Fixture {
    pub(crate) fn new(preset: &str, duration: &str) -> Self {
        let config = ScenarioBuilder::preset(preset)
            .unwrap()
            .duration(duration)
            .customers(400)
            .product_count(200)
            .orders_per_hour(40.0)
            .start(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
            .seed(11)
            .build()
            .unwrap();
        let cohorts = CohortBehaviorModel::adjusted(&config.profile().cohort_adjustment()).unwrap();
        let bank = RngBank::new(config.seed());
        let reference = ReferenceGenerator::new(&config, &cohorts, bank).generate().unwrap();

        let curve = IntensityCurve::build(&config, &mut bank.stream(StreamSlot::Curve));
        let mut state = RunState::new(&reference.products);
        let plan = HourlyPlan::build(&curve, config.volume().hourly_rate(), config.intensity(), &mut state);
        let signals = HourlySignals::build(&config, &plan, &mut bank.stream(StreamSlot::Signals)).unwrap();
        let orders = {
            let engine = OrderEngine::new(&config, &reference, &cohorts, signals.delay_probability()).unwrap();
            generate_orders(&engine, &plan, &mut state, bank, 1).unwrap()
        };

        Self { config, cohorts, reference, plan, signals, orders }
    }

    pub(crate) fn rng(&self) -> StreamRng {
        RngBank::new(self.config.seed()).stream(StreamSlot::Tickets)
    }
}
