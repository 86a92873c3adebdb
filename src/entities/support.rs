//! Support ticket generation
//!
//! Hourly ticket counts come from the shared signals. Delivery tickets attach
//! to delayed orders placed in earlier hours; most other tickets attach to
//! some earlier order, so every reference points backwards in time.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::LogNormal;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cohort::{CohortBehaviorModel, Distribution};
use crate::entities::signals::{round_with_carry, HourlySignals};
use crate::orders::OrderStream;
use crate::reference::ReferenceData;
use crate::scenario::{IssueMix, ScenarioConfig};
use crate::simulation::{GenerationError, GenerationResult};
use crate::types::{AgentType, CustomerId, IssueCategory, OrderId, Severity, SupportChannel, TicketId};

/// Share of non-delivery tickets about a specific order
pub const ORDER_LINK_RATE: f64 = 0.7;
/// Share of tickets resolved at all
pub const RESOLUTION_RATE: f64 = 0.85;
/// Log-space deviation of resolution times around their SLA-scaled median
const RESOLUTION_SPREAD: f64 = 0.5;
/// Number of support agents
pub const AGENT_COUNT: u32 = 50;
/// Intensity above which chatbots take most tickets
pub const CHATBOT_INTENSITY_THRESHOLD: f64 = 2.0;

const SEVERITY_WEIGHTS: &[(Severity, f64)] = &[(Severity::Low, 0.6), (Severity::Medium, 0.3), (Severity::High, 0.1)];
const BREACHED_CSAT: &[(u8, f64)] = &[(1, 0.4), (2, 0.4), (3, 0.2)];
const MET_CSAT: &[(u8, f64)] = &[(3, 0.2), (4, 0.3), (5, 0.5)];

/// A customer support ticket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportTicket {
    /// Unique identifier
    pub ticket_id: TicketId,
    /// Customer who raised the ticket
    pub customer_id: CustomerId,
    /// Order the ticket is about, if any
    pub order_id: Option<OrderId>,
    /// Time the ticket was opened
    pub created_ts: DateTime<Utc>,
    /// Contact channel
    pub channel: SupportChannel,
    /// Issue category
    pub issue_category: IssueCategory,
    /// Issue subcategory
    pub issue_subcategory: String,
    /// Ticket severity
    pub severity: Severity,
    /// First agent response, if inside the scenario window
    pub first_response_ts: Option<DateTime<Utc>>,
    /// Resolution time, if resolved inside the scenario window
    pub resolved_ts: Option<DateTime<Utc>>,
    /// Whether the resolution target was missed
    pub sla_breach: bool,
    /// Whole hours past the resolution target
    pub sla_breach_hours: u32,
    /// Satisfaction score 1-5, for resolved tickets
    pub csat: Option<u8>,
    /// Handling agent
    pub agent_id: String,
    /// Human or chatbot
    pub agent_type: AgentType,
    /// Number of escalations
    pub escalation_count: u32,
    /// Minutes from creation to resolution, for resolved tickets
    pub resolution_time_minutes: Option<u32>,
}

struct IssueTables {
    standard: Distribution<IssueCategory>,
    refund_heavy: Distribution<IssueCategory>,
    payment_heavy: Distribution<IssueCategory>,
}

impl IssueTables {
    fn new() -> GenerationResult<Self> {
        let build = |mix: IssueMix| {
            Distribution::new(mix.weights())
                .map_err(|e| GenerationError::entity_generation(format!("issue mix {:?}: {}", mix, e)))
        };
        Ok(Self {
            standard: build(IssueMix::Standard)?,
            refund_heavy: build(IssueMix::RefundHeavy)?,
            payment_heavy: build(IssueMix::PaymentHeavy)?,
        })
    }

    fn get(&self, mix: IssueMix) -> &Distribution<IssueCategory> {
        match mix {
            IssueMix::Standard => &self.standard,
            IssueMix::RefundHeavy => &self.refund_heavy,
            IssueMix::PaymentHeavy => &self.payment_heavy,
        }
    }
}

/// Ticket generator over the reference data and the order stream
pub struct TicketGenerator<'a> {
    config: &'a ScenarioConfig,
    reference: &'a ReferenceData,
    cohorts: &'a CohortBehaviorModel,
    orders: &'a OrderStream,
    issues: IssueTables,
    severity: Distribution<Severity>,
    breached_csat: Distribution<u8>,
    met_csat: Distribution<u8>,
    resolution_spread: LogNormal<f64>,
}

impl std::fmt::Debug for TicketGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketGenerator")
            .field("scenario", &self.config.name())
            .field("orders", &self.orders.len())
            .finish()
    }
}

impl<'a> TicketGenerator<'a> {
    /// Create a generator
    pub fn new(
        config: &'a ScenarioConfig,
        reference: &'a ReferenceData,
        cohorts: &'a CohortBehaviorModel,
        orders: &'a OrderStream,
    ) -> GenerationResult<Self> {
        if reference.customers.is_empty() {
            return Err(GenerationError::entity_generation("support tickets need at least one customer"));
        }
        let table = |name: &str, e: crate::cohort::DistributionError| {
            GenerationError::entity_generation(format!("{}: {}", name, e))
        };
        Ok(Self {
            config,
            reference,
            cohorts,
            orders,
            issues: IssueTables::new()?,
            severity: Distribution::new(SEVERITY_WEIGHTS).map_err(|e| table("severity", e))?,
            breached_csat: Distribution::new(BREACHED_CSAT).map_err(|e| table("csat", e))?,
            met_csat: Distribution::new(MET_CSAT).map_err(|e| table("csat", e))?,
            resolution_spread: LogNormal::new(0.0, RESOLUTION_SPREAD)
                .map_err(|e| GenerationError::entity_generation(format!("resolution spread: {}", e)))?,
        })
    }

    /// Generate every ticket of the run in creation-hour order
    #[instrument(skip_all, fields(scenario = %self.config.name()))]
    pub fn generate<R: Rng + ?Sized>(&self, signals: &HourlySignals, rng: &mut R) -> Vec<SupportTicket> {
        let counts = round_with_carry(signals.ticket_targets());
        let mut tickets = Vec::with_capacity(counts.iter().sum());
        let mut delayed: Vec<usize> = Vec::new();

        for (hour, &count) in counts.iter().enumerate() {
            // orders of earlier hours become linkable
            if hour > 0 {
                delayed.extend(self.orders.hour_range(hour - 1).filter(|&o| self.orders.orders[o].is_delayed));
            }
            let earlier = self.orders.hour_offsets.get(hour).copied().unwrap_or(0);
            let issues = self.issues.get(self.config.profile().issue_mix(hour));
            let hour_start = self.config.hour_start(hour);

            for _ in 0..count {
                let created_ts = hour_start + Duration::seconds(rng.gen_range(0..3_600));
                let issue = issues.sample(rng);
                tickets.push(self.ticket(issue, created_ts, earlier, &delayed, rng));
            }
            if count > 0 {
                debug!(hour, tickets = count, "Generated support tickets");
            }
        }

        info!("Generated {} support tickets", tickets.len());
        tickets
    }

    fn ticket<R: Rng + ?Sized>(
        &self,
        issue: IssueCategory,
        created_ts: DateTime<Utc>,
        earlier: usize,
        delayed: &[usize],
        rng: &mut R,
    ) -> SupportTicket {
        let order = if issue == IssueCategory::Delivery && !delayed.is_empty() {
            Some(delayed[rng.gen_range(0..delayed.len())])
        } else if earlier > 0 && rng.gen_bool(ORDER_LINK_RATE) {
            Some(rng.gen_range(0..earlier))
        } else {
            None
        };
        let customer_index = match order {
            Some(o) => self.orders.order_customers[o],
            None => rng.gen_range(0..self.reference.customers.len()),
        };
        let customer = &self.reference.customers[customer_index];
        let channel = self.cohorts.profile(customer.cohort).support.sample(rng);

        let severity = if issue == IssueCategory::Delivery { Severity::Medium } else { self.severity.sample(rng) };
        let subcategories = issue.subcategories();
        let issue_subcategory = subcategories[rng.gen_range(0..subcategories.len())].to_string();

        let sla = severity.sla_target_hours();
        let load = self.config.intensity().min(3.0);
        let resolution_hours = sla * 0.7 * load * rng.sample(self.resolution_spread);
        let resolved = rng.gen_bool(RESOLUTION_RATE);
        let sla_breach = !resolved || resolution_hours > sla;
        let sla_breach_hours = (resolution_hours - sla).max(0.0) as u32;

        let end = self.config.end();
        let within = |ts: DateTime<Utc>| if ts < end { Some(ts) } else { None };
        let first_response_ts = within(created_ts + hours(resolution_hours * 0.1));
        let resolved_ts = if resolved { within(created_ts + hours(resolution_hours)) } else { None };

        let csat = resolved_ts.map(|_| {
            if sla_breach {
                self.breached_csat.sample(rng)
            } else {
                self.met_csat.sample(rng)
            }
        });
        let chatbot_share = if self.config.intensity() > CHATBOT_INTENSITY_THRESHOLD { 0.6 } else { 0.3 };
        let agent_type = if rng.gen_bool(chatbot_share) { AgentType::Chatbot } else { AgentType::Human };
        let escalation_count = if severity == Severity::High { rng.gen_range(0..=2) } else { 0 };

        SupportTicket {
            ticket_id: TicketId::from_rng(rng),
            customer_id: customer.customer_id,
            order_id: order.map(|o| self.orders.orders[o].order_id),
            created_ts,
            channel,
            issue_category: issue,
            issue_subcategory,
            severity,
            first_response_ts,
            resolved_ts,
            sla_breach,
            sla_breach_hours,
            csat,
            agent_id: format!("AGENT_{:03}", rng.gen_range(1..=AGENT_COUNT)),
            agent_type,
            escalation_count,
            resolution_time_minutes: resolved_ts.map(|_| (resolution_hours * 60.0) as u32),
        }
    }
}

fn hours(value: f64) -> Duration {
    Duration::seconds((value * 3_600.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::Fixture;

    #[test]
    fn test_tickets_reference_earlier_orders() {
        let fixture = Fixture::new("returns_wave", "3d");
        let generator =
            TicketGenerator::new(&fixture.config, &fixture.reference, &fixture.cohorts, &fixture.orders).unwrap();
        let mut rng = fixture.rng();
        let tickets = generator.generate(&fixture.signals, &mut rng);
        assert!(!tickets.is_empty());

        for ticket in &tickets {
            assert!(ticket.created_ts >= fixture.config.start() && ticket.created_ts < fixture.config.end());
            if let Some(order_id) = ticket.order_id {
                let order = fixture.orders.orders.iter().find(|o| o.order_id == order_id).unwrap();
                assert!(order.order_ts < ticket.created_ts);
                assert_eq!(order.customer_id, ticket.customer_id);
            }
            if let Some(resolved) = ticket.resolved_ts {
                assert!(resolved < fixture.config.end());
                assert!(ticket.csat.is_some());
            }
        }
    }

    #[test]
    fn test_returns_wave_is_refund_heavy() {
        let fixture = Fixture::new("returns_wave", "3d");
        let generator =
            TicketGenerator::new(&fixture.config, &fixture.reference, &fixture.cohorts, &fixture.orders).unwrap();
        let tickets = generator.generate(&fixture.signals, &mut fixture.rng());
        assert!(tickets.iter().all(|t| matches!(
            t.issue_category,
            IssueCategory::Refund | IssueCategory::Product | IssueCategory::Other
        )));
    }

    #[test]
    fn test_delivery_tickets_point_at_delayed_orders() {
        let fixture = Fixture::new("supply_disruption", "3d");
        let generator =
            TicketGenerator::new(&fixture.config, &fixture.reference, &fixture.cohorts, &fixture.orders).unwrap();
        let tickets = generator.generate(&fixture.signals, &mut fixture.rng());
        let delivery: Vec<_> = tickets
            .iter()
            .filter(|t| t.issue_category == IssueCategory::Delivery && t.order_id.is_some())
            .collect();
        assert!(!delivery.is_empty());
        for ticket in delivery {
            assert_eq!(ticket.severity, Severity::Medium);
        }
    }
}
