#[cfg(test)]
pub mod test_utils {
    use chrono::{SubsecRound, Utc};
    use governance_core_api::UserRequestStatus;
    use governance_core_db::models::access::UserRequestModel;
    use heapless::String as HeaplessString;
    use uuid::Uuid;

    pub fn create_test_user_request() -> UserRequestModel {
        let now = Utc::now().trunc_subsecs(6);
        let mut request = UserRequestModel {
            id: Uuid::new_v4(),
            requested_by: 7,
            description: Some(HeaplessString::try_from("SAP access").unwrap()),
            status: UserRequestStatus::Pending,
            created_at: now,
            updated_at: now,
            hash: 0,
        };
        request.rehash().unwrap();
        request
    }
}
