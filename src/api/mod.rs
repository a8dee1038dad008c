pub mod error;
pub mod leave_request;
pub mod notification;


use actix_web::web;

use crate::workflow::{
    Clock, EmployeeDirectory, Inbox, NotificationDispatcher, Notifier, RequestStore, WorkflowEngine,
};

/// The collaborators handlers are instantiated with.
pub trait LeaveBackend: 'static {
    type Directory: EmployeeDirectory + 'static;
    type Store: RequestStore + 'static;
    type Clock: Clock + 'static;
    type Notifier: Notifier + Inbox + 'static;
}

pub type EngineData<B> = web::Data<
    WorkflowEngine<
        <B as LeaveBackend>::Directory,
        <B as LeaveBackend>::Store,
        <B as LeaveBackend>::Clock,
    >,
>;

pub type DispatcherData<B> = web::Data<NotificationDispatcher<<B as LeaveBackend>::Notifier>>;
