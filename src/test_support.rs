// Scripted in-memory backend for unit tests. Replies are queued per
// endpoint and popped in call order; executed commands are recorded so
// tests can assert exactly what went over the wire.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{Backend, ExecReply, LoginReply};
use crate::error::ClientError;
use crate::model::ApiBook;

#[derive(Default)]
pub struct FakeBackend {
    login_replies: RefCell<VecDeque<Result<LoginReply, ClientError>>>,
    books_replies: RefCell<VecDeque<Result<Vec<ApiBook>, ClientError>>>,
    exec_replies: RefCell<VecDeque<Result<ExecReply, ClientError>>>,
    executed: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, reply: Result<LoginReply, ClientError>) {
        self.login_replies.borrow_mut().push_back(reply);
    }

    pub fn push_login_ok(&self, role: &str, username: &str) {
        self.push_login(Ok(LoginReply {
            success: true,
            role: Some(role.to_string()),
            username: Some(username.to_string()),
            message: None,
        }));
    }

    pub fn push_login_rejected(&self, message: &str) {
        self.push_login(Ok(LoginReply {
            success: false,
            role: None,
            username: None,
            message: Some(message.to_string()),
        }));
    }

    pub fn push_books(&self, reply: Result<Vec<ApiBook>, ClientError>) {
        self.books_replies.borrow_mut().push_back(reply);
    }

    pub fn push_exec(&self, reply: Result<ExecReply, ClientError>) {
        self.exec_replies.borrow_mut().push_back(reply);
    }

    pub fn push_exec_ok(&self, stdout: &str) {
        self.push_exec(Ok(ExecReply {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
    }

    pub fn push_exec_fail(&self, stderr: &str) {
        self.push_exec(Ok(ExecReply {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }));
    }

    /// Every `(command, args)` sent to the execute endpoint, in order.
    pub fn executed(&self) -> Vec<(String, Vec<String>)> {
        self.executed.borrow().clone()
    }
}

impl Backend for FakeBackend {
    fn login(&self, _username: &str, _password: &str) -> Result<LoginReply, ClientError> {
        self.login_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Connectivity("no scripted login reply".into())))
    }

    fn books(&self) -> Result<Vec<ApiBook>, ClientError> {
        self.books_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Connectivity("no scripted books reply".into())))
    }

    fn execute(&self, command: &str, args: &[String]) -> Result<ExecReply, ClientError> {
        self.executed
            .borrow_mut()
            .push((command.to_string(), args.to_vec()));
        self.exec_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Connectivity("no scripted execute reply".into())))
    }
}
