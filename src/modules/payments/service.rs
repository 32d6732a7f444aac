use edudesk_core::{CancelSignal, DataResult, ErrorInfo, Outcome, PaginationMeta, PaginationParams};
use edudesk_models::{PaymentId, StudentId};
use tracing::{info, instrument};

use super::model::{Payment, RecordPaymentDto};
use super::repository::PaymentRepository;
use crate::modules::students::repository::StudentRepository;

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(payments, students, dto, cancel), fields(student_id = %dto.student_id))]
    pub async fn record(
        payments: &dyn PaymentRepository,
        students: &dyn StudentRepository,
        dto: RecordPaymentDto,
        cancel: &CancelSignal,
    ) -> Outcome<Payment> {
        cancel
            .run(async move {
                if students.find(dto.student_id).await?.is_none() {
                    return Err(ErrorInfo::not_found("Student"));
                }
                let payment = payments.insert(&dto).await?;
                info!(
                    payment_id = %payment.id,
                    amount_cents = payment.amount_cents,
                    "Payment recorded"
                );
                Ok(payment)
            })
            .await
    }

    #[instrument(skip(payments, cancel))]
    pub async fn get(
        payments: &dyn PaymentRepository,
        id: PaymentId,
        cancel: &CancelSignal,
    ) -> Outcome<Payment> {
        cancel
            .run(async move {
                payments
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Payment"))
            })
            .await
    }

    #[instrument(skip(payments, students, cancel))]
    pub async fn list_for_student(
        payments: &dyn PaymentRepository,
        students: &dyn StudentRepository,
        student_id: StudentId,
        params: PaginationParams,
        cancel: &CancelSignal,
    ) -> Outcome<DataResult<Payment>> {
        cancel
            .run(async move {
                if students.find(student_id).await?.is_none() {
                    return Err(ErrorInfo::not_found("Student"));
                }
                let (data, total) = payments
                    .list_for_student(student_id, params.limit(), params.offset())
                    .await?;
                Ok(DataResult::paged(data, PaginationMeta::for_params(&params, total)))
            })
            .await
    }
}
