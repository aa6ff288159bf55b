/// A descriptor written by hand with two-space indentation.
pub const PROJECT_DESCRIPTOR: &str = r"# Project descriptor
name: todo-list
region: us-east-1
language: ts

sdk:
  language: ts
  path: ../client/src/sdk   # generated client

classes:
  # the main api
  - path: ./task.ts
    type: jsonrpc
    methods:
      - name: cleanup
        type: cron
        cronString: 0 3 * * *
  - path: ./user.ts
    type: http

# end of file
";

/// The canonical rendering of [`PROJECT_DESCRIPTOR`].
pub const PROJECT_DESCRIPTOR_RENDERED: &str = r"# Project descriptor
name: todo-list
region: us-east-1
language: ts

sdk:
    language: ts
    path: ../client/src/sdk        # generated client

classes:
    # the main api
  - path: ./task.ts
    type: jsonrpc
    methods:
      - name: cleanup
        type: cron
        cronString: 0 3 * * *
  - path: ./user.ts
    type: http

# end of file
";

/// Nested mappings with irregular indentation.
pub const IRREGULAR_INDENTATION: &str = "backend:
   scripts:
        deploy: npm run deploy
        local: npm run dev
   language: js
frontend:
      path: ./client
";

/// A descriptor without any class list.
pub const DESCRIPTOR_WITHOUT_CLASSES: &str = "name: hello
# deployment region
region: us-east-1
";
